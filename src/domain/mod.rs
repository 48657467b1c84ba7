//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Hexagram Context: 卦内容与语言
//! - Narration Context: 文本规整与朗读分段
//! - Playback Context: 播放会话状态机

pub mod hexagram;
pub mod narration;
pub mod playback;
