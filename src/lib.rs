//! I Ching Narrator - 卦辞朗读服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Hexagram Context: 卦内容与多语言文本
//! - Narration Context: 文本规整、分段、分块、音色选择
//! - Playback Context: 播放会话状态机
//!
//! 应用层 (application/):
//! - Ports: 语音合成、音频句柄、渲染端、仓储、听众注册表
//! - Narration: 朗读控制器
//! - Commands / Queries: 起卦记录与卦内容
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Memory: 音频句柄存储、听众注册表
//! - Worker: 空闲听众回收
//! - Persistence: SQLite + JSON
//! - Adapters: ElevenLabs / Fake 合成器
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
