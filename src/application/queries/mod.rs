//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod hexagram_queries;
mod reading_queries;

pub mod handlers;

pub use hexagram_queries::*;
pub use reading_queries::*;
