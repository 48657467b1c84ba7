//! Speech Synthesis Port - 语音合成抽象
//!
//! 每个片段一次调用，不做合并；具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::hexagram::Language;

/// 合成错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SynthesisError {
    /// 服务端返回非 2xx
    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    /// 原始音频数据
    pub audio_data: Vec<u8>,
    /// 服务端返回的 Content-Type
    pub content_type: String,
}

/// Speech Synthesis Port
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    /// 合成一段已规整的文本
    ///
    /// 音色参数由实现按语言选择，调用方只提供文本和语言
    async fn synthesize(
        &self,
        text: &str,
        language: Language,
    ) -> Result<SynthesizedAudio, SynthesisError>;

    /// 检查服务是否可用
    async fn health_check(&self) -> bool {
        true
    }
}
