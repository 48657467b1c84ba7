//! Playback Context - Errors

use thiserror::Error;

use super::PlaybackState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("状态 {state} 下不能执行 {action}")]
    InvalidTransition {
        state: PlaybackState,
        action: &'static str,
    },

    #[error("片段越界: {index} (共 {total} 段)")]
    SegmentOutOfRange { index: usize, total: usize },

    #[error("片段 {0} 没有可播放的音频")]
    MissingHandle(usize),

    #[error("没有可朗读的片段")]
    NoSegments,
}
