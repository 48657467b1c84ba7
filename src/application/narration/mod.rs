//! 朗读用例
//!
//! 控制器按听众隔离，持有当前播放会话

mod controller;

pub use controller::{
    NarrationConfig, NarrationController, NarrationTarget, PreparedNarration,
    DEFAULT_MAX_CONCURRENT_REQUESTS,
};
