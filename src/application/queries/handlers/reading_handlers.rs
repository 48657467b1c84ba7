//! Reading Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{ReadingRecord, ReadingRepositoryPort};
use crate::application::queries::{ListReadings, DEFAULT_READING_LIMIT};

/// 单次查询的最大条数
const MAX_READING_LIMIT: usize = 200;

/// ListReadings Handler - 最新的在前
pub struct ListReadingsHandler {
    reading_repo: Arc<dyn ReadingRepositoryPort>,
}

impl ListReadingsHandler {
    pub fn new(reading_repo: Arc<dyn ReadingRepositoryPort>) -> Self {
        Self { reading_repo }
    }

    pub async fn handle(&self, query: ListReadings) -> Result<Vec<ReadingRecord>, ApplicationError> {
        let owner_id = query.owner_id.trim();
        if owner_id.is_empty() {
            return Err(ApplicationError::validation("owner_id is required"));
        }

        let limit = query
            .limit
            .unwrap_or(DEFAULT_READING_LIMIT)
            .clamp(1, MAX_READING_LIMIT);

        Ok(self.reading_repo.find_by_owner(owner_id, limit).await?)
    }
}
