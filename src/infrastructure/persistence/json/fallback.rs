//! Fallback Hexagram Repository
//!
//! 先查托管数据库，出错或缺失时回退到静态 JSON

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{HexagramRepositoryPort, RepositoryError};
use crate::domain::hexagram::{HexagramContent, HexagramNumber};

pub struct FallbackHexagramRepository {
    primary: Arc<dyn HexagramRepositoryPort>,
    fallback: Arc<dyn HexagramRepositoryPort>,
}

impl FallbackHexagramRepository {
    pub fn new(
        primary: Arc<dyn HexagramRepositoryPort>,
        fallback: Arc<dyn HexagramRepositoryPort>,
    ) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl HexagramRepositoryPort for FallbackHexagramRepository {
    async fn find_by_number(
        &self,
        number: HexagramNumber,
    ) -> Result<Option<HexagramContent>, RepositoryError> {
        match self.primary.find_by_number(number).await {
            Ok(Some(content)) => return Ok(Some(content)),
            Ok(None) => {
                tracing::debug!(hexagram = %number, "Hexagram missing in primary store, using fallback");
            }
            Err(e) => {
                tracing::warn!(hexagram = %number, error = %e, "Primary store failed, using fallback");
            }
        }
        self.fallback.find_by_number(number).await
    }

    async fn find_all(&self) -> Result<Vec<HexagramContent>, RepositoryError> {
        match self.primary.find_all().await {
            Ok(all) if !all.is_empty() => Ok(all),
            Ok(_) => self.fallback.find_all().await,
            Err(e) => {
                tracing::warn!(error = %e, "Primary store failed, using fallback");
                self.fallback.find_all().await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hexagram::{Language, LocalizedText};
    use crate::infrastructure::persistence::json::JsonHexagramRepository;

    struct BrokenStore;

    #[async_trait]
    impl HexagramRepositoryPort for BrokenStore {
        async fn find_by_number(
            &self,
            _number: HexagramNumber,
        ) -> Result<Option<HexagramContent>, RepositoryError> {
            Err(RepositoryError::DatabaseError("connection refused".to_string()))
        }

        async fn find_all(&self) -> Result<Vec<HexagramContent>, RepositoryError> {
            Err(RepositoryError::DatabaseError("connection refused".to_string()))
        }
    }

    fn named(number: u8, name: &str) -> HexagramContent {
        let mut content = HexagramContent::new(HexagramNumber::new(number).unwrap());
        content.name = LocalizedText::new().with(Language::En, name);
        content
    }

    #[tokio::test]
    async fn test_primary_wins_when_present() {
        let repo = FallbackHexagramRepository::new(
            Arc::new(JsonHexagramRepository::from_records(vec![named(1, "Primary")])),
            Arc::new(JsonHexagramRepository::from_records(vec![
                named(1, "Fallback"),
                named(2, "Only in fallback"),
            ])),
        );

        let one = HexagramNumber::new(1).unwrap();
        let two = HexagramNumber::new(2).unwrap();
        assert_eq!(
            repo.find_by_number(one).await.unwrap().unwrap().display_name(Language::En),
            "Primary"
        );
        assert_eq!(
            repo.find_by_number(two).await.unwrap().unwrap().display_name(Language::En),
            "Only in fallback"
        );
    }

    #[tokio::test]
    async fn test_primary_error_falls_back() {
        let repo = FallbackHexagramRepository::new(
            Arc::new(BrokenStore),
            Arc::new(JsonHexagramRepository::from_records(vec![named(1, "Fallback")])),
        );
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
        assert!(repo
            .find_by_number(HexagramNumber::new(1).unwrap())
            .await
            .unwrap()
            .is_some());
    }
}
