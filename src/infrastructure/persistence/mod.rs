//! Persistence Layer - 数据持久化
//!
//! SQLite 托管数据库和静态 JSON 回退

pub mod json;
pub mod sqlite;

pub use json::{FallbackHexagramRepository, JsonHexagramRepository};
