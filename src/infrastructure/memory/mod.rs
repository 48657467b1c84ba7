//! Memory Layer - In-Memory State Management
//!
//! 实现音频句柄存储和听众注册表，所有状态只在进程内存中

mod handle_store;
mod listener_registry;

pub use handle_store::InMemoryAudioHandleStore;
pub use listener_registry::InMemoryListenerRegistry;
