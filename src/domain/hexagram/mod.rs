//! Hexagram Context - 卦象限界上下文
//!
//! 职责:
//! - 卦内容记录（多语言文本）
//! - 语言闭集与回退规则

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::HexagramContent;
pub use errors::HexagramError;
pub use value_objects::{HexagramNumber, Language, LocalizedText};
