//! HTTP Handlers

mod audio;
mod hexagram;
mod narration;
mod ping;
mod reading;
mod websocket;

pub use audio::*;
pub use hexagram::*;
pub use narration::*;
pub use ping::*;
pub use reading::*;
pub use websocket::*;
