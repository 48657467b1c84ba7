//! Events - WebSocket 事件推送

mod publisher;
mod renderer;

pub use publisher::{EventPublisher, WsEvent};
pub use renderer::EventRenderer;
