//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（语音合成、音频句柄、渲染端、仓储、听众注册表）
//! - narration: 朗读控制器（会话生命周期与并发加载）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod narration;
pub mod ports;
pub mod queries;

pub use commands::{
    handlers::{SaveReadingHandler, UpdateJournalNoteHandler},
    SaveReading, UpdateJournalNote,
};

pub use error::ApplicationError;

pub use narration::{NarrationConfig, NarrationController, NarrationTarget, PreparedNarration};

pub use ports::{
    AudioBlob, AudioHandleStorePort, AudioRendererPort, HexagramRepositoryPort,
    ListenerRegistryPort, ReadingRecord, ReadingRepositoryPort, RenderCommand, RepositoryError,
    ResourceError, SpeechSynthesisPort, SynthesisError, SynthesizedAudio,
};

pub use queries::{
    handlers::{GetHexagramHandler, ListHexagramsHandler, ListReadingsHandler, PreviewSegmentsHandler},
    GetHexagram, ListHexagrams, ListReadings, PreviewSegments,
};
