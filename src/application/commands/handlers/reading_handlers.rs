//! Reading Command Handlers

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::application::commands::{SaveReading, UpdateJournalNote};
use crate::application::error::ApplicationError;
use crate::application::ports::{ReadingRecord, ReadingRepositoryPort};
use crate::domain::hexagram::{HexagramError, HexagramNumber};

/// 变爻校验：1..=6，排序去重
fn validate_lines(lines: &[u8]) -> Result<Vec<u8>, HexagramError> {
    let mut valid = Vec::with_capacity(lines.len());
    for &line in lines {
        if !(1..=6).contains(&line) {
            return Err(HexagramError::InvalidLine(line));
        }
        valid.push(line);
    }
    valid.sort_unstable();
    valid.dedup();
    Ok(valid)
}

/// 去掉首尾空白，空白视为未填写
fn clean_text(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// SaveReading Handler
pub struct SaveReadingHandler {
    reading_repo: Arc<dyn ReadingRepositoryPort>,
}

impl SaveReadingHandler {
    pub fn new(reading_repo: Arc<dyn ReadingRepositoryPort>) -> Self {
        Self { reading_repo }
    }

    pub async fn handle(&self, cmd: SaveReading) -> Result<ReadingRecord, ApplicationError> {
        let owner_id = cmd.owner_id.trim().to_string();
        if owner_id.is_empty() {
            return Err(ApplicationError::validation("owner_id is required"));
        }

        let hexagram_number = HexagramNumber::new(cmd.hexagram_number).map_err(|e| {
            HexagramError::InvalidNumber(format!("{}: {}", cmd.hexagram_number, e))
        })?;
        let changing_lines = validate_lines(&cmd.changing_lines)?;

        let now = Utc::now();
        let reading = ReadingRecord {
            id: Uuid::new_v4(),
            owner_id,
            hexagram_number,
            changing_lines,
            question: clean_text(cmd.question),
            journal_note: clean_text(cmd.journal_note),
            language: cmd.language,
            created_at: now,
            updated_at: now,
        };

        self.reading_repo.save(&reading).await?;

        tracing::info!(
            reading_id = %reading.id,
            owner_id = %reading.owner_id,
            hexagram = %reading.hexagram_number,
            "Reading saved"
        );

        Ok(reading)
    }
}

/// UpdateJournalNote Handler - 只允许记录的所有者修改
pub struct UpdateJournalNoteHandler {
    reading_repo: Arc<dyn ReadingRepositoryPort>,
}

impl UpdateJournalNoteHandler {
    pub fn new(reading_repo: Arc<dyn ReadingRepositoryPort>) -> Self {
        Self { reading_repo }
    }

    pub async fn handle(&self, cmd: UpdateJournalNote) -> Result<ReadingRecord, ApplicationError> {
        let mut reading = self
            .reading_repo
            .find_by_id(cmd.reading_id)
            .await?
            .filter(|r| r.owner_id == cmd.owner_id.trim())
            .ok_or_else(|| ApplicationError::not_found("Reading", cmd.reading_id))?;

        reading.journal_note = clean_text(cmd.journal_note);
        reading.updated_at = Utc::now();

        self.reading_repo
            .update_note(reading.id, reading.journal_note.as_deref(), reading.updated_at)
            .await?;

        tracing::info!(reading_id = %reading.id, "Journal note updated");

        Ok(reading)
    }
}
