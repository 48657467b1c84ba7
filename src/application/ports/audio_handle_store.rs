//! Audio Handle Store Port - 音频句柄存储
//!
//! 句柄只在内存中存在；释放后不可再解析

use std::sync::Arc;

use thiserror::Error;

use super::SynthesizedAudio;
use crate::domain::playback::{AudioHandle, HandleId};

/// 句柄分配/释放错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Empty audio payload for segment {0}")]
    EmptyPayload(usize),

    #[error("Audio handle not found: {0}")]
    NotFound(HandleId),
}

/// 句柄指向的音频数据
#[derive(Debug, Clone)]
pub struct AudioBlob {
    pub data: Arc<Vec<u8>>,
    pub content_type: String,
}

/// Audio Handle Store Port
pub trait AudioHandleStorePort: Send + Sync {
    /// 保存一段合成音频并分配句柄
    fn allocate(
        &self,
        segment_order: usize,
        audio: SynthesizedAudio,
    ) -> Result<AudioHandle, ResourceError>;

    /// 获取句柄对应的音频
    fn resolve(&self, id: &HandleId) -> Option<AudioBlob>;

    /// 释放句柄
    fn release(&self, id: &HandleId) -> Result<(), ResourceError>;

    /// 当前存活的句柄数
    fn live_count(&self) -> usize;
}
