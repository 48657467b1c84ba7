//! Event Renderer - 通过 WebSocket 驱动浏览器端播放

use std::sync::Arc;

use super::EventPublisher;
use crate::application::ports::{AudioRendererPort, RenderCommand};
use crate::domain::playback::PlaybackSnapshot;

/// 绑定到一个听众的渲染端
pub struct EventRenderer {
    listener_id: String,
    publisher: Arc<EventPublisher>,
}

impl EventRenderer {
    pub fn new(listener_id: impl Into<String>, publisher: Arc<EventPublisher>) -> Self {
        Self {
            listener_id: listener_id.into(),
            publisher,
        }
    }
}

impl AudioRendererPort for EventRenderer {
    fn render(&self, command: RenderCommand) {
        tracing::trace!(listener_id = %self.listener_id, command = ?command, "Render command");
        self.publisher.publish_render(&self.listener_id, command);
    }

    fn publish_state(&self, snapshot: &PlaybackSnapshot) {
        self.publisher
            .publish_state(&self.listener_id, snapshot.clone());
    }
}
