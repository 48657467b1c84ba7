//! Fake Synthesizer - 不调用外部服务的合成器
//!
//! 用于本地开发和测试：返回由文本生成的占位音频

use async_trait::async_trait;
use std::time::Duration;

use crate::application::ports::{SpeechSynthesisPort, SynthesisError, SynthesizedAudio};
use crate::domain::hexagram::Language;

/// Fake Synthesizer 配置
#[derive(Debug, Clone)]
pub struct FakeSynthesizerConfig {
    /// 模拟合成延迟（毫秒）
    pub latency_ms: u64,
    /// 文本包含该子串时返回 provider 错误
    pub fail_on: Option<String>,
    pub content_type: String,
}

impl Default for FakeSynthesizerConfig {
    fn default() -> Self {
        Self {
            latency_ms: 0,
            fail_on: None,
            content_type: "audio/mpeg".to_string(),
        }
    }
}

/// Fake Synthesizer
pub struct FakeSynthesizer {
    config: FakeSynthesizerConfig,
}

impl FakeSynthesizer {
    pub fn new(config: FakeSynthesizerConfig) -> Self {
        tracing::info!(
            latency_ms = config.latency_ms,
            "FakeSynthesizer initialized"
        );
        Self { config }
    }
}

#[async_trait]
impl SpeechSynthesisPort for FakeSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        language: Language,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        tracing::debug!(
            text_len = text.len(),
            language = %language,
            "FakeSynthesizer: returning placeholder audio"
        );

        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        if let Some(marker) = &self.config.fail_on {
            if text.contains(marker.as_str()) {
                return Err(SynthesisError::Provider {
                    status: 429,
                    message: "simulated rate limit".to_string(),
                });
            }
        }

        // ID3 头 + 语言 + 文本，保证非空且每段不同
        let mut audio_data = b"ID3".to_vec();
        audio_data.extend_from_slice(language.as_str().as_bytes());
        audio_data.extend_from_slice(text.as_bytes());

        Ok(SynthesizedAudio {
            audio_data,
            content_type: self.config.content_type.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_distinct_audio() {
        let fake = FakeSynthesizer::new(FakeSynthesizerConfig::default());
        let a = fake.synthesize("first", Language::En).await.unwrap();
        let b = fake.synthesize("second", Language::En).await.unwrap();
        assert_ne!(a.audio_data, b.audio_data);
        assert!(a.audio_data.starts_with(b"ID3"));
        assert_eq!(a.content_type, "audio/mpeg");
    }

    #[tokio::test]
    async fn test_fail_on_marker() {
        let fake = FakeSynthesizer::new(FakeSynthesizerConfig {
            fail_on: Some("boom".to_string()),
            ..Default::default()
        });
        let result = fake.synthesize("this goes boom", Language::En).await;
        assert!(matches!(result, Err(SynthesisError::Provider { status: 429, .. })));
    }
}
