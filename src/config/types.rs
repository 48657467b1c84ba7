//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub tts: TtsConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 语音合成后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    #[default]
    ElevenLabs,
    /// 本地假合成器，不访问网络
    Fake,
}

/// 语音合成配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default)]
    pub provider: TtsProvider,

    #[serde(default = "default_tts_base_url")]
    pub base_url: String,

    /// 未设置时读取 `ELEVENLABS_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// 同一会话同时进行的合成请求数
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

fn default_tts_base_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_tts_timeout() -> u64 {
    30
}

fn default_output_format() -> String {
    "mp3_44100_128".to_string()
}

fn default_max_concurrent_requests() -> usize {
    3
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: TtsProvider::default(),
            base_url: default_tts_base_url(),
            api_key: None,
            timeout_secs: default_tts_timeout(),
            output_format: default_output_format(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

impl TtsConfig {
    /// 有效的 API key（空白视为未设置）
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// 卦内容配置
#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    /// 随包发布的 JSON 内容，SQLite 为空时用于填充，读取失败时兜底
    #[serde(default = "default_fallback_json")]
    pub fallback_json: PathBuf,

    #[serde(default = "default_db_path")]
    pub database_path: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_fallback_json() -> PathBuf {
    PathBuf::from("data/hexagrams.json")
}

fn default_db_path() -> String {
    "data/iching.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            fallback_json: default_fallback_json(),
            database_path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// 听众回收配置
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_idle_timeout() -> u64 {
    1800 // 30 分钟
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否输出 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
