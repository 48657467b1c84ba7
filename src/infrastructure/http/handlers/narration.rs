//! Narration Handlers - 朗读请求与传输控制
//!
//! 请求立即返回会话信息，音频在后台加载，进度通过 WebSocket 推送

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::narration::{NarrationController, NarrationTarget};
use crate::application::ApplicationError;
use crate::domain::hexagram::HexagramNumber;
use crate::domain::playback::{PlaybackSnapshot, SessionId};
use crate::infrastructure::http::dto::{
    parse_language, ApiResponse, ListenerRequest, MuteRequest, NarrationRequest,
    NarrationStartedResponse, RendererEvent, RendererEventRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

fn require_listener(state: &AppState, listener_id: &str) -> Result<Arc<NarrationController>, ApiError> {
    state
        .listener_registry
        .get(listener_id)
        .ok_or_else(|| ApiError::NotFound(format!("Listener not found: {}", listener_id)))
}

fn narration_target(req: &NarrationRequest) -> Result<NarrationTarget, ApiError> {
    match (req.hexagram_number, req.text.as_deref()) {
        (Some(number), None) => HexagramNumber::new(number)
            .map(NarrationTarget::Hexagram)
            .map_err(|e| ApiError::BadRequest(format!("Invalid hexagram number {}: {}", number, e))),
        (None, Some(text)) => Ok(NarrationTarget::Text(text.to_string())),
        _ => Err(ApiError::BadRequest(
            "Exactly one of hexagram_number or text is required".to_string(),
        )),
    }
}

// ============================================================================
// Request
// ============================================================================

pub async fn request_narration(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NarrationRequest>,
) -> Result<Json<ApiResponse<NarrationStartedResponse>>, ApiError> {
    if req.listener_id.trim().is_empty() {
        return Err(ApiError::BadRequest("listener_id is required".to_string()));
    }
    let target = narration_target(&req)?;
    let language = parse_language(&req.language);

    let controller = state.listener_registry.get_or_create(&req.listener_id);
    let prepared = controller.prepare(target, language).await?;
    let response = NarrationStartedResponse {
        session_id: prepared.session_id.to_string(),
        total_segments: prepared.total_segments(),
    };

    tokio::spawn(async move {
        let listener_id = controller.listener_id().to_string();
        match controller.load(prepared).await {
            Ok(_) => {}
            Err(ApplicationError::Superseded) => {
                tracing::debug!(listener_id = %listener_id, "Narration load superseded");
            }
            Err(e) => {
                tracing::warn!(listener_id = %listener_id, error = %e, "Narration load failed");
            }
        }
    });

    Ok(Json(ApiResponse::success(response)))
}

// ============================================================================
// Transport
// ============================================================================

pub async fn play(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListenerRequest>,
) -> Result<Json<ApiResponse<PlaybackSnapshot>>, ApiError> {
    let controller = require_listener(&state, &req.listener_id)?;
    Ok(Json(ApiResponse::success(controller.play().await?)))
}

pub async fn pause(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListenerRequest>,
) -> Result<Json<ApiResponse<PlaybackSnapshot>>, ApiError> {
    let controller = require_listener(&state, &req.listener_id)?;
    Ok(Json(ApiResponse::success(controller.pause().await?)))
}

pub async fn next(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListenerRequest>,
) -> Result<Json<ApiResponse<PlaybackSnapshot>>, ApiError> {
    let controller = require_listener(&state, &req.listener_id)?;
    Ok(Json(ApiResponse::success(controller.next().await?)))
}

pub async fn previous(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListenerRequest>,
) -> Result<Json<ApiResponse<PlaybackSnapshot>>, ApiError> {
    let controller = require_listener(&state, &req.listener_id)?;
    Ok(Json(ApiResponse::success(controller.previous().await?)))
}

/// 静音对没有会话的听众同样生效
pub async fn set_muted(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MuteRequest>,
) -> Result<Json<ApiResponse<PlaybackSnapshot>>, ApiError> {
    let controller = state.listener_registry.get_or_create(&req.listener_id);
    Ok(Json(ApiResponse::success(controller.set_muted(req.muted).await)))
}

pub async fn get_state(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListenerRequest>,
) -> Result<Json<ApiResponse<PlaybackSnapshot>>, ApiError> {
    let snapshot = match state.listener_registry.get(&req.listener_id) {
        Some(controller) => controller.snapshot().await,
        None => PlaybackSnapshot::idle(false),
    };
    Ok(Json(ApiResponse::success(snapshot)))
}

pub async fn close(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListenerRequest>,
) -> Result<Json<ApiResponse<PlaybackSnapshot>>, ApiError> {
    let controller = require_listener(&state, &req.listener_id)?;
    Ok(Json(ApiResponse::success(controller.close().await)))
}

// ============================================================================
// Renderer callbacks
// ============================================================================

/// 浏览器端回报播放结束或进度
pub async fn renderer_event(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RendererEventRequest>,
) -> Result<Json<ApiResponse<PlaybackSnapshot>>, ApiError> {
    let controller = require_listener(&state, &req.listener_id)?;
    let session_id = SessionId::from_uuid(req.session_id);

    let snapshot = match req.event {
        RendererEvent::Ended { segment_index } => {
            controller.on_segment_ended(session_id, segment_index).await
        }
        RendererEvent::TimeUpdate {
            segment_index,
            current_time,
            duration,
        } => {
            controller
                .on_time_update(session_id, segment_index, current_time, duration)
                .await
        }
    };

    Ok(Json(ApiResponse::success(snapshot)))
}
