//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{RepositoryError, ResourceError, SynthesisError};
use crate::domain::hexagram::HexagramError;
use crate::domain::playback::PlaybackError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 状态无效
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 请求已被更新的朗读请求取代
    #[error("Narration superseded by a newer request")]
    Superseded,

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 语音合成失败
    #[error("Synthesis error: {0}")]
    SynthesisError(#[from] SynthesisError),

    /// 音频句柄错误
    #[error("Resource error: {0}")]
    ResourceError(#[from] ResourceError),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建状态无效错误
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => Self::NotFound {
                resource_type: "Entity",
                id,
            },
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<PlaybackError> for ApplicationError {
    fn from(err: PlaybackError) -> Self {
        Self::InvalidState(err.to_string())
    }
}

impl From<HexagramError> for ApplicationError {
    fn from(err: HexagramError) -> Self {
        match err {
            HexagramError::NotFound(number) => Self::not_found("Hexagram", number),
            other => Self::ValidationError(other.to_string()),
        }
    }
}
