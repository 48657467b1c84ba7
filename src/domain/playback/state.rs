//! Playback Context - 播放状态与对外快照

use serde::{Deserialize, Serialize};

use crate::domain::hexagram::Language;

/// 播放状态机的状态
///
/// `Idle → Loading → Ready → Playing ⇄ Paused → Ended`，`Error` 只能从 `Loading` 进入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Ended,
    Error,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Loading => "loading",
            PlaybackState::Ready => "ready",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Ended => "ended",
            PlaybackState::Error => "error",
        }
    }

    /// 可以接受手动换段 / 播放命令的状态
    pub fn accepts_transport(&self) -> bool {
        !matches!(self, PlaybackState::Idle | PlaybackState::Loading)
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 暴露给 UI 的可观察状态
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub state: PlaybackState,
    pub language: Language,
    pub is_loading: bool,
    pub is_playing: bool,
    pub is_muted: bool,
    pub current_segment_index: usize,
    pub total_segments: usize,
    /// 当前片段已播放秒数
    pub current_time: f64,
    /// 当前片段总秒数
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlaybackSnapshot {
    /// 没有会话时的快照
    pub fn idle(is_muted: bool) -> Self {
        Self {
            session_id: None,
            state: PlaybackState::Idle,
            language: Language::En,
            is_loading: false,
            is_playing: false,
            is_muted,
            current_segment_index: 0,
            total_segments: 0,
            current_time: 0.0,
            duration: 0.0,
            error: None,
        }
    }
}
