//! Hexagram Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::HexagramRepositoryPort;
use crate::application::queries::{GetHexagram, ListHexagrams, PreviewSegments};
use crate::domain::hexagram::{HexagramContent, HexagramError, HexagramNumber};
use crate::domain::narration::{build_segments, NarrationSegment};

fn parse_number(number: u8) -> Result<HexagramNumber, ApplicationError> {
    HexagramNumber::new(number)
        .map_err(|e| HexagramError::InvalidNumber(format!("{}: {}", number, e)).into())
}

/// GetHexagram Handler
pub struct GetHexagramHandler {
    hexagram_repo: Arc<dyn HexagramRepositoryPort>,
}

impl GetHexagramHandler {
    pub fn new(hexagram_repo: Arc<dyn HexagramRepositoryPort>) -> Self {
        Self { hexagram_repo }
    }

    pub async fn handle(&self, query: GetHexagram) -> Result<HexagramContent, ApplicationError> {
        let number = parse_number(query.number)?;
        self.hexagram_repo
            .find_by_number(number)
            .await?
            .ok_or_else(|| HexagramError::NotFound(query.number).into())
    }
}

/// ListHexagrams Handler
pub struct ListHexagramsHandler {
    hexagram_repo: Arc<dyn HexagramRepositoryPort>,
}

impl ListHexagramsHandler {
    pub fn new(hexagram_repo: Arc<dyn HexagramRepositoryPort>) -> Self {
        Self { hexagram_repo }
    }

    pub async fn handle(&self, _query: ListHexagrams) -> Result<Vec<HexagramContent>, ApplicationError> {
        Ok(self.hexagram_repo.find_all().await?)
    }
}

/// PreviewSegments Handler - 只分段，不合成
pub struct PreviewSegmentsHandler {
    hexagram_repo: Arc<dyn HexagramRepositoryPort>,
}

impl PreviewSegmentsHandler {
    pub fn new(hexagram_repo: Arc<dyn HexagramRepositoryPort>) -> Self {
        Self { hexagram_repo }
    }

    pub async fn handle(
        &self,
        query: PreviewSegments,
    ) -> Result<Vec<NarrationSegment>, ApplicationError> {
        let number = parse_number(query.number)?;
        let content = self
            .hexagram_repo
            .find_by_number(number)
            .await?
            .ok_or(HexagramError::NotFound(query.number))?;

        Ok(build_segments(&content, query.language))
    }
}
