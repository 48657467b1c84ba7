//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_handle_store;
mod audio_renderer;
mod listener_registry;
mod repositories;
mod speech_synthesis;

pub use audio_handle_store::{AudioBlob, AudioHandleStorePort, ResourceError};
pub use audio_renderer::{AudioRendererPort, RenderCommand};
pub use listener_registry::ListenerRegistryPort;
pub use repositories::{
    HexagramRepositoryPort, ReadingRecord, ReadingRepositoryPort, RepositoryError,
};
pub use speech_synthesis::{SpeechSynthesisPort, SynthesisError, SynthesizedAudio};
