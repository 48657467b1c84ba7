//! Playback Context - 音频句柄

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 音频句柄唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleId(Uuid);

impl HandleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for HandleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HandleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 一个片段合成后的可播放音频引用
///
/// 音频字节保存在句柄存储中；会话结束或被替换时必须显式释放
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioHandle {
    pub id: HandleId,
    pub segment_order: usize,
    pub content_type: String,
    pub size_bytes: usize,
}
