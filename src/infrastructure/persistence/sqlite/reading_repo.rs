//! SQLite Reading Repository

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{ReadingRecord, ReadingRepositoryPort, RepositoryError};
use crate::domain::hexagram::{HexagramNumber, Language};

/// SQLite Reading Repository
pub struct SqliteReadingRepository {
    pool: DbPool,
}

impl SqliteReadingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// 固定宽度的时间戳，保证按字符串排序即按时间排序
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

#[derive(FromRow)]
struct ReadingRow {
    id: String,
    owner_id: String,
    hexagram_number: i64,
    changing_lines: String,
    question: Option<String>,
    journal_note: Option<String>,
    language: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ReadingRow> for ReadingRecord {
    type Error = RepositoryError;

    fn try_from(row: ReadingRow) -> Result<Self, Self::Error> {
        let hexagram_number = u8::try_from(row.hexagram_number)
            .ok()
            .and_then(|n| HexagramNumber::new(n).ok())
            .ok_or_else(|| {
                RepositoryError::SerializationError(format!(
                    "bad hexagram number {}",
                    row.hexagram_number
                ))
            })?;

        Ok(ReadingRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            owner_id: row.owner_id,
            hexagram_number,
            changing_lines: serde_json::from_str(&row.changing_lines)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            question: row.question,
            journal_note: row.journal_note,
            language: Language::resolve_code(&row.language),
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, owner_id, hexagram_number, changing_lines, question, \
     journal_note, language, created_at, updated_at FROM readings";

#[async_trait]
impl ReadingRepositoryPort for SqliteReadingRepository {
    async fn save(&self, reading: &ReadingRecord) -> Result<(), RepositoryError> {
        let lines = serde_json::to_string(&reading.changing_lines)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO readings (id, owner_id, hexagram_number, changing_lines, question,
                                  journal_note, language, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(reading.id.to_string())
        .bind(&reading.owner_id)
        .bind(reading.hexagram_number.get() as i64)
        .bind(lines)
        .bind(&reading.question)
        .bind(&reading.journal_note)
        .bind(reading.language.as_str())
        .bind(timestamp(&reading.created_at))
        .bind(timestamp(&reading.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Duplicate(reading.id.to_string())
            }
            other => RepositoryError::DatabaseError(other.to_string()),
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReadingRecord>, RepositoryError> {
        let row: Option<ReadingRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(ReadingRecord::try_from).transpose()
    }

    async fn find_by_owner(
        &self,
        owner_id: &str,
        limit: usize,
    ) -> Result<Vec<ReadingRecord>, RepositoryError> {
        let rows: Vec<ReadingRow> = sqlx::query_as(&format!(
            "{} WHERE owner_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ?",
            SELECT_COLUMNS
        ))
        .bind(owner_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(ReadingRecord::try_from).collect()
    }

    async fn update_note(
        &self,
        id: Uuid,
        journal_note: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE readings SET journal_note = ?, updated_at = ? WHERE id = ?")
            .bind(journal_note)
            .bind(timestamp(&updated_at))
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn repo() -> SqliteReadingRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteReadingRepository::new(pool)
    }

    fn reading(owner: &str) -> ReadingRecord {
        let now = Utc::now();
        ReadingRecord {
            id: Uuid::new_v4(),
            owner_id: owner.to_string(),
            hexagram_number: HexagramNumber::new(11).unwrap(),
            changing_lines: vec![1, 4],
            question: Some("Should I move?".to_string()),
            journal_note: None,
            language: Language::Fr,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_round_trip_record() {
        let repo = repo().await;
        let record = reading("alice");
        repo.save(&record).await.unwrap();

        let found = repo.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(found.changing_lines, vec![1, 4]);
        assert_eq!(found.language, Language::Fr);
        assert_eq!(found.question, record.question);
        assert_eq!(timestamp(&found.created_at), timestamp(&record.created_at));
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let repo = repo().await;
        let record = reading("alice");
        repo.save(&record).await.unwrap();
        assert!(matches!(
            repo.save(&record).await,
            Err(RepositoryError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_note() {
        let repo = repo().await;
        let result = repo.update_note(Uuid::new_v4(), Some("x"), Utc::now()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_limit_applies() {
        let repo = repo().await;
        for _ in 0..3 {
            repo.save(&reading("alice")).await.unwrap();
        }
        assert_eq!(repo.find_by_owner("alice", 2).await.unwrap().len(), 2);
        assert!(repo.find_by_owner("nobody", 10).await.unwrap().is_empty());
    }
}
