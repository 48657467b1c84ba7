//! Playback Context - 播放管理上下文
//!
//! 一次朗读请求对应一个会话：有序片段、音频句柄、传输状态机

mod errors;
mod handle;
mod session;
mod state;

pub use errors::PlaybackError;
pub use handle::{AudioHandle, HandleId};
pub use session::{EndedOutcome, PlayAction, PlaybackSession, SessionId, Step};
pub use state::{PlaybackSnapshot, PlaybackState};
