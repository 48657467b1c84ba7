//! Configuration Loader
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml / config.local.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, TtsProvider};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// ElevenLabs 官方 SDK 使用的环境变量
const API_KEY_ENV: &str = "ELEVENLABS_API_KEY";

/// 加载应用配置
///
/// # 环境变量示例
/// - `ICHING_SERVER__PORT=8080`
/// - `ICHING_TTS__PROVIDER=fake`
/// - `ICHING_TTS__MAX_CONCURRENT_REQUESTS=2`
/// - `ICHING_CONTENT__DATABASE_PATH=/data/iching.db`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置，`None` 时搜索默认文件名
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5080)?
        .set_default("tts.provider", "elevenlabs")?
        .set_default("tts.base_url", "https://api.elevenlabs.io")?
        .set_default("tts.timeout_secs", 30)?
        .set_default("tts.output_format", "mp3_44100_128")?
        .set_default("tts.max_concurrent_requests", 3)?
        .set_default("content.fallback_json", "data/hexagrams.json")?
        .set_default("content.database_path", "data/iching.db")?
        .set_default("content.max_connections", 5)?
        .set_default("playback.idle_timeout_secs", 1800)?
        .set_default("playback.sweep_interval_secs", 60)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 例如: ICHING_TTS__API_KEY=sk-...
    builder = builder.add_source(
        Environment::with_prefix("ICHING")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let mut app_config: AppConfig = builder.build()?.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    apply_api_key_fallback(&mut app_config, std::env::var(API_KEY_ENV).ok());
    validate_config(&app_config)?;

    Ok(app_config)
}

fn apply_api_key_fallback(config: &mut AppConfig, fallback: Option<String>) {
    if config.tts.api_key().is_none() {
        config.tts.api_key = fallback;
    }
}

/// 验证配置有效性；缺少凭据属于启动错误
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.tts.provider == TtsProvider::ElevenLabs {
        if config.tts.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "TTS base URL cannot be empty".to_string(),
            ));
        }
        if config.tts.api_key().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "TTS API key is required (tts.api_key or {})",
                API_KEY_ENV
            )));
        }
    }

    if config.tts.max_concurrent_requests == 0 {
        return Err(ConfigError::ValidationError(
            "tts.max_concurrent_requests must be at least 1".to_string(),
        ));
    }

    if config.content.database_path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.playback.sweep_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Sweep interval cannot be 0".to_string(),
        ));
    }

    Ok(())
}

fn mask_key(key: Option<&str>) -> String {
    match key {
        Some(key) if key.chars().count() > 4 => {
            let chars: Vec<char> = key.chars().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("****{}", tail)
        }
        Some(_) => "****".to_string(),
        None => "<unset>".to_string(),
    }
}

/// 打印配置信息（API key 打码）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("TTS Provider: {:?}", config.tts.provider);
    tracing::info!("TTS Base URL: {}", config.tts.base_url);
    tracing::info!("TTS API Key: {}", mask_key(config.tts.api_key()));
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::info!("TTS Concurrency: {}", config.tts.max_concurrent_requests);
    tracing::info!("Hexagram JSON: {:?}", config.content.fallback_json);
    tracing::info!("Database: {}", config.content.database_path);
    tracing::info!(
        "Idle Timeout: {}s (sweep every {}s)",
        config.playback.idle_timeout_secs,
        config.playback.sweep_interval_secs
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
