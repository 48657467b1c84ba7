//! JSON Hexagram Repository - 静态 JSON 文件
//!
//! 文件内容为卦记录数组，启动时一次性读入内存

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;

use crate::application::ports::{HexagramRepositoryPort, RepositoryError};
use crate::domain::hexagram::{HexagramContent, HexagramNumber};

pub struct JsonHexagramRepository {
    hexagrams: BTreeMap<u8, HexagramContent>,
}

impl JsonHexagramRepository {
    /// 从文件加载
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RepositoryError::IoError(format!("{}: {}", path.display(), e)))?;

        let repo = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            count = repo.hexagrams.len(),
            "Hexagram JSON loaded"
        );
        Ok(repo)
    }

    /// 解析 JSON 数组；单条记录无效时跳过，不影响其他记录
    pub fn from_json(raw: &str) -> Result<Self, RepositoryError> {
        let values: Vec<serde_json::Value> = serde_json::from_str(raw)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        let mut hexagrams = BTreeMap::new();
        for (position, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<HexagramContent>(value) {
                Ok(content) => {
                    if hexagrams.insert(content.number.get(), content).is_some() {
                        tracing::warn!(position = position, "Duplicate hexagram record replaced");
                    }
                }
                Err(e) => {
                    tracing::warn!(position = position, error = %e, "Skipping invalid hexagram record");
                }
            }
        }

        Ok(Self { hexagrams })
    }

    pub fn from_records(records: Vec<HexagramContent>) -> Self {
        Self {
            hexagrams: records
                .into_iter()
                .map(|content| (content.number.get(), content))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.hexagrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hexagrams.is_empty()
    }
}

#[async_trait]
impl HexagramRepositoryPort for JsonHexagramRepository {
    async fn find_by_number(
        &self,
        number: HexagramNumber,
    ) -> Result<Option<HexagramContent>, RepositoryError> {
        Ok(self.hexagrams.get(&number.get()).cloned())
    }

    async fn find_all(&self) -> Result<Vec<HexagramContent>, RepositoryError> {
        Ok(self.hexagrams.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hexagram::Language;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        {"number": 2, "name": {"en": "The Receptive"}, "chineseName": "坤"},
        {"number": 1, "name": {"en": "The Creative", "zh": "乾为天"}, "chineseName": "乾",
         "interpretation": {"en": "Pure yang.", "fr": null}},
        {"number": 99, "name": {"en": "Broken"}}
    ]"#;

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let repo = JsonHexagramRepository::load(file.path()).await.unwrap();
        assert_eq!(repo.len(), 2);

        let all = repo.find_all().await.unwrap();
        assert_eq!(all[0].number.get(), 1);
        assert_eq!(all[1].number.get(), 2);

        let creative = repo
            .find_by_number(HexagramNumber::new(1).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(creative.interpretation.resolve(Language::Fr), "Pure yang.");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = JsonHexagramRepository::load(dir.path().join("absent.json")).await;
        assert!(matches!(result, Err(RepositoryError::IoError(_))));
    }

    #[test]
    fn test_not_an_array() {
        assert!(matches!(
            JsonHexagramRepository::from_json("{}"),
            Err(RepositoryError::SerializationError(_))
        ));
    }
}
