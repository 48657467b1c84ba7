//! ElevenLabs Client - 调用 ElevenLabs 文本转语音服务
//!
//! 实现 SpeechSynthesisPort trait，每个片段一次 HTTP 请求
//!
//! 外部 API:
//! POST {base_url}/v1/text-to-speech/{voice_id}?output_format=...
//! Header: xi-api-key
//! Request: {"text", "model_id", "voice_settings": {...}}  (JSON)
//! Response: audio/mpeg binary

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{SpeechSynthesisPort, SynthesisError, SynthesizedAudio};
use crate::domain::hexagram::Language;
use crate::domain::narration::{voice_profile, VoiceProfile};

const API_KEY_HEADER: &str = "xi-api-key";
const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

/// 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct TextToSpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

impl<'a> TextToSpeechRequest<'a> {
    fn new(text: &'a str, profile: &'a VoiceProfile) -> Self {
        Self {
            text,
            model_id: profile.model_id,
            voice_settings: VoiceSettings {
                stability: profile.stability,
                similarity_boost: profile.similarity_boost,
                style: profile.style,
                use_speaker_boost: profile.use_speaker_boost,
            },
        }
    }
}

/// ElevenLabs 客户端配置
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    /// 服务基础 URL
    pub base_url: String,
    pub api_key: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 输出格式，如 mp3_44100_128
    pub output_format: String,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
            output_format: "mp3_44100_128".to_string(),
        }
    }
}

impl ElevenLabsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// ElevenLabs 客户端
pub struct ElevenLabsClient {
    client: Client,
    config: ElevenLabsConfig,
}

impl ElevenLabsClient {
    pub fn new(config: ElevenLabsConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn synthesis_url(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}?output_format={}",
            self.config.base_url.trim_end_matches('/'),
            voice_id,
            self.config.output_format
        )
    }

    fn health_url(&self) -> String {
        format!("{}/v1/models", self.config.base_url.trim_end_matches('/'))
    }
}

/// 从错误响应中取出可读原因
///
/// 服务端通常返回 `{"detail": {"status": "...", "message": "..."}}`，
/// 有时 detail 是字符串
fn provider_message(body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(message)) => message,
        Some(detail) => detail
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| detail.to_string()),
        None if body.trim().is_empty() => "no response body".to_string(),
        None => body.trim().to_string(),
    }
}

#[async_trait]
impl SpeechSynthesisPort for ElevenLabsClient {
    async fn synthesize(
        &self,
        text: &str,
        language: Language,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        let profile = voice_profile(language);
        let url = self.synthesis_url(profile.voice_id);

        tracing::debug!(
            url = %url,
            language = %language,
            text_len = text.len(),
            "Sending synthesis request"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(ACCEPT, DEFAULT_CONTENT_TYPE)
            .json(&TextToSpeechRequest::new(text, profile))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout
                } else if e.is_connect() {
                    SynthesisError::Network(format!("Cannot connect to speech provider: {}", e))
                } else {
                    SynthesisError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = provider_message(&body);
            tracing::warn!(status = status.as_u16(), message = %message, "Speech provider rejected request");
            return Err(SynthesisError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        if audio_data.is_empty() {
            return Err(SynthesisError::InvalidResponse("empty audio body".to_string()));
        }

        tracing::info!(
            language = %language,
            content_type = %content_type,
            audio_size = audio_data.len(),
            "Segment synthesized"
        );

        Ok(SynthesizedAudio {
            audio_data,
            content_type,
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(&self.health_url())
            .header(API_KEY_HEADER, &self.config.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ElevenLabsConfig::default();
        assert_eq!(config.base_url, "https://api.elevenlabs.io");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_config_builder() {
        let config = ElevenLabsConfig::new("key")
            .with_base_url("http://localhost:9000/")
            .with_timeout(5);
        let client = ElevenLabsClient::new(config).unwrap();
        assert_eq!(
            client.synthesis_url("voice"),
            "http://localhost:9000/v1/text-to-speech/voice?output_format=mp3_44100_128"
        );
    }

    #[test]
    fn test_request_body_uses_language_profile() {
        let profile = voice_profile(Language::Ja);
        let body = serde_json::to_value(TextToSpeechRequest::new("こんにちは", profile)).unwrap();
        assert_eq!(body["text"], "こんにちは");
        assert_eq!(body["model_id"], profile.model_id);
        assert_eq!(body["voice_settings"]["use_speaker_boost"], false);
    }

    #[test]
    fn test_provider_message() {
        assert_eq!(
            provider_message(r#"{"detail":{"status":"quota_exceeded","message":"Quota exceeded"}}"#),
            "Quota exceeded"
        );
        assert_eq!(provider_message(r#"{"detail":"Invalid API key"}"#), "Invalid API key");
        assert_eq!(provider_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(provider_message(""), "no response body");
    }
}
