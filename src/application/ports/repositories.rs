//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite / JSON 文件）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::hexagram::{HexagramContent, HexagramNumber, Language};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

// ============================================================================
// Hexagram Repository
// ============================================================================

/// Hexagram Repository Port
///
/// 卦内容只读
#[async_trait]
pub trait HexagramRepositoryPort: Send + Sync {
    /// 根据卦序查找
    async fn find_by_number(
        &self,
        number: HexagramNumber,
    ) -> Result<Option<HexagramContent>, RepositoryError>;

    /// 获取全部卦，按卦序排列
    async fn find_all(&self) -> Result<Vec<HexagramContent>, RepositoryError>;
}

// ============================================================================
// Reading Repository
// ============================================================================

/// 一次起卦记录（含日记）
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingRecord {
    pub id: Uuid,
    /// 调用方提供的不透明用户标识
    pub owner_id: String,
    pub hexagram_number: HexagramNumber,
    /// 变爻，取值 1..=6，升序且不重复
    pub changing_lines: Vec<u8>,
    pub question: Option<String>,
    pub journal_note: Option<String>,
    pub language: Language,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reading Repository Port
#[async_trait]
pub trait ReadingRepositoryPort: Send + Sync {
    /// 保存记录
    async fn save(&self, reading: &ReadingRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReadingRecord>, RepositoryError>;

    /// 获取某用户的记录，最新的在前
    async fn find_by_owner(
        &self,
        owner_id: &str,
        limit: usize,
    ) -> Result<Vec<ReadingRecord>, RepositoryError>;

    /// 更新日记
    async fn update_note(
        &self,
        id: Uuid,
        journal_note: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
}
