//! SQLite Persistence - SQLite 数据库持久化实现

mod database;
mod hexagram_repo;
mod reading_repo;

pub use database::*;
pub use hexagram_repo::*;
pub use reading_repo::*;
