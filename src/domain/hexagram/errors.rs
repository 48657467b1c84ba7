//! Hexagram Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HexagramError {
    #[error("卦不存在: {0}")]
    NotFound(u8),

    #[error("无效的卦序: {0}")]
    InvalidNumber(String),

    #[error("无效的爻位: {0}")]
    InvalidLine(u8),
}
