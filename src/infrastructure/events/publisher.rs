//! Event Publisher Implementation
//!
//! WebSocket 事件推送实现，每个听众一个广播通道

use crate::application::ports::RenderCommand;
use crate::domain::playback::PlaybackSnapshot;
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;

/// 每个通道缓存的事件数
const CHANNEL_CAPACITY: usize = 100;

/// WebSocket 事件类型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum WsEvent {
    /// 渲染命令
    Render(RenderCommand),
    /// 播放状态变更
    StateChanged(PlaybackSnapshot),
    /// 听众被关闭（空闲超时等）
    ListenerClosed { listener_id: String, reason: String },
}

/// 事件发布器
pub struct EventPublisher {
    /// listener_id -> broadcast sender
    listener_channels: DashMap<String, broadcast::Sender<WsEvent>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            listener_channels: DashMap::new(),
        }
    }

    /// 注册听众的事件通道
    pub fn register_listener(&self, listener_id: &str) -> broadcast::Receiver<WsEvent> {
        self.listener_channels
            .entry(listener_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// 取消注册听众
    pub fn unregister_listener(&self, listener_id: &str) {
        self.listener_channels.remove(listener_id);
    }

    /// 获取听众的事件接收器
    pub fn subscribe(&self, listener_id: &str) -> Option<broadcast::Receiver<WsEvent>> {
        self.listener_channels
            .get(listener_id)
            .map(|s| s.subscribe())
    }

    /// 发布渲染命令
    pub fn publish_render(&self, listener_id: &str, command: RenderCommand) {
        self.publish_to_listener(listener_id, WsEvent::Render(command));
    }

    /// 发布状态快照
    pub fn publish_state(&self, listener_id: &str, snapshot: PlaybackSnapshot) {
        self.publish_to_listener(listener_id, WsEvent::StateChanged(snapshot));
    }

    /// 发布听众关闭事件
    pub fn publish_listener_closed(&self, listener_id: &str, reason: &str) {
        self.publish_to_listener(
            listener_id,
            WsEvent::ListenerClosed {
                listener_id: listener_id.to_string(),
                reason: reason.to_string(),
            },
        );
    }

    /// 发布事件到指定听众
    fn publish_to_listener(&self, listener_id: &str, event: WsEvent) {
        if let Some(sender) = self.listener_channels.get(listener_id) {
            if let Err(e) = sender.send(event) {
                tracing::debug!(
                    listener_id = %listener_id,
                    error = %e,
                    "Failed to publish event (no receivers)"
                );
            }
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
