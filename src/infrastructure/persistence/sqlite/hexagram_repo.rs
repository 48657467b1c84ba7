//! SQLite Hexagram Repository

use async_trait::async_trait;
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{HexagramRepositoryPort, RepositoryError};
use crate::domain::hexagram::{HexagramContent, HexagramNumber, LocalizedText};

/// SQLite Hexagram Repository
pub struct SqliteHexagramRepository {
    pool: DbPool,
}

impl SqliteHexagramRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// 写入或覆盖卦内容
    pub async fn save_all(&self, hexagrams: &[HexagramContent]) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        for hexagram in hexagrams {
            sqlx::query(
                r#"
                INSERT INTO hexagrams (number, name, chinese_name, interpretation, judgement)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT(number) DO UPDATE SET
                    name = excluded.name,
                    chinese_name = excluded.chinese_name,
                    interpretation = excluded.interpretation,
                    judgement = excluded.judgement
                "#,
            )
            .bind(hexagram.number.get() as i64)
            .bind(to_json(&hexagram.name)?)
            .bind(&hexagram.chinese_name)
            .bind(to_json(&hexagram.interpretation)?)
            .bind(to_json(&hexagram.judgement)?)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    pub async fn count(&self) -> Result<usize, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM hexagrams")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        Ok(count as usize)
    }

    /// 表为空时从另一个仓储导入，返回导入条数
    pub async fn seed_from(
        &self,
        source: &dyn HexagramRepositoryPort,
    ) -> Result<usize, RepositoryError> {
        if self.count().await? > 0 {
            return Ok(0);
        }

        let hexagrams = source.find_all().await?;
        self.save_all(&hexagrams).await?;

        tracing::info!(count = hexagrams.len(), "Hexagram table seeded");
        Ok(hexagrams.len())
    }
}

fn to_json(text: &LocalizedText) -> Result<String, RepositoryError> {
    serde_json::to_string(text).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

fn from_json(column: &str) -> Result<LocalizedText, RepositoryError> {
    serde_json::from_str(column).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

#[derive(FromRow)]
struct HexagramRow {
    number: i64,
    name: String,
    chinese_name: Option<String>,
    interpretation: String,
    judgement: String,
}

impl TryFrom<HexagramRow> for HexagramContent {
    type Error = RepositoryError;

    fn try_from(row: HexagramRow) -> Result<Self, Self::Error> {
        let number = u8::try_from(row.number)
            .ok()
            .and_then(|n| HexagramNumber::new(n).ok())
            .ok_or_else(|| {
                RepositoryError::SerializationError(format!("bad hexagram number {}", row.number))
            })?;

        Ok(HexagramContent {
            number,
            name: from_json(&row.name)?,
            chinese_name: row.chinese_name,
            interpretation: from_json(&row.interpretation)?,
            judgement: from_json(&row.judgement)?,
        })
    }
}

#[async_trait]
impl HexagramRepositoryPort for SqliteHexagramRepository {
    async fn find_by_number(
        &self,
        number: HexagramNumber,
    ) -> Result<Option<HexagramContent>, RepositoryError> {
        let row: Option<HexagramRow> = sqlx::query_as(
            "SELECT number, name, chinese_name, interpretation, judgement FROM hexagrams WHERE number = ?",
        )
        .bind(number.get() as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(HexagramContent::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<HexagramContent>, RepositoryError> {
        let rows: Vec<HexagramRow> = sqlx::query_as(
            "SELECT number, name, chinese_name, interpretation, judgement FROM hexagrams ORDER BY number",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(HexagramContent::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hexagram::Language;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn repo() -> SqliteHexagramRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteHexagramRepository::new(pool)
    }

    fn receptive() -> HexagramContent {
        let mut content = HexagramContent::new(HexagramNumber::new(2).unwrap());
        content.name = LocalizedText::new()
            .with(Language::En, "The Receptive")
            .with(Language::Zh, "坤为地");
        content.chinese_name = Some("坤".to_string());
        content.judgement = LocalizedText::new().with(Language::En, "Sublime success.");
        content
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = repo().await;
        repo.save_all(&[receptive()]).await.unwrap();

        let found = repo
            .find_by_number(HexagramNumber::new(2).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, receptive());

        let missing = repo
            .find_by_number(HexagramNumber::new(3).unwrap())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let source = repo().await;
        source.save_all(&[receptive()]).await.unwrap();

        let target = repo().await;
        assert_eq!(target.seed_from(&source).await.unwrap(), 1);
        assert_eq!(target.seed_from(&source).await.unwrap(), 0);
        assert_eq!(target.find_all().await.unwrap().len(), 1);
    }
}
