//! WebSocket Handler - 每个听众一条连接
//!
//! 服务端推送渲染命令和状态快照；客户端消息只用于保活

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;

use crate::infrastructure::events::WsEvent;
use crate::infrastructure::http::state::AppState;

pub async fn listener_websocket_handler(
    ws: WebSocketUpgrade,
    Path(listener_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_listener_socket(socket, listener_id, state))
}

fn encode(event: &WsEvent) -> Option<Message> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Message::Text(json)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize event");
            None
        }
    }
}

async fn handle_listener_socket(socket: WebSocket, listener_id: String, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // 先注册通道，再取快照，避免漏掉中间的事件
    let mut event_rx = state.event_publisher.register_listener(&listener_id);
    let controller = state.listener_registry.get_or_create(&listener_id);

    tracing::info!(listener_id = %listener_id, "WebSocket connected");

    let initial = WsEvent::StateChanged(controller.snapshot().await);
    if let Some(msg) = encode(&initial) {
        if sender.send(msg).await.is_err() {
            state.event_publisher.unregister_listener(&listener_id);
            return;
        }
    }

    let listener_for_forward = listener_id.clone();
    let mut forward_task = tokio::spawn(async move {
        loop {
            let event = match event_rx.recv().await {
                Ok(event) => event,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        listener_id = %listener_for_forward,
                        skipped = skipped,
                        "WebSocket consumer lagged"
                    );
                    continue;
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            };

            let closing = matches!(event, WsEvent::ListenerClosed { .. });
            let Some(msg) = encode(&event) else {
                continue;
            };
            if let Err(e) = sender.send(msg).await {
                tracing::debug!(
                    listener_id = %listener_for_forward,
                    error = %e,
                    "Failed to send WebSocket message"
                );
                break;
            }
            if closing {
                let _ = sender.close().await;
                break;
            }
        }
    });

    let registry = state.listener_registry.clone();
    let listener_for_receive = listener_id.clone();
    let mut receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::info!(listener_id = %listener_for_receive, "WebSocket closed by client");
                    break;
                }
                Err(e) => {
                    tracing::debug!(listener_id = %listener_for_receive, error = %e, "WebSocket error");
                    break;
                }
                Ok(_) => registry.touch(&listener_for_receive),
            }
        }
    });

    tokio::select! {
        _ = &mut forward_task => receive_task.abort(),
        _ = &mut receive_task => forward_task.abort(),
    }

    state.event_publisher.unregister_listener(&listener_id);
    tracing::info!(listener_id = %listener_id, "WebSocket disconnected");
}
