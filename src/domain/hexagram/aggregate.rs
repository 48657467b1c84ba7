//! Hexagram Context - Aggregate Root

use serde::{Deserialize, Serialize};

use super::{HexagramNumber, Language, LocalizedText};

/// 卦的内容记录
///
/// 不变量:
/// - number 在 1 - 64 之间且唯一
/// - 会话期间不可变，由外部内容存储持有
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HexagramContent {
    pub number: HexagramNumber,
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese_name: Option<String>,
    #[serde(default)]
    pub interpretation: LocalizedText,
    #[serde(default)]
    pub judgement: LocalizedText,
}

impl HexagramContent {
    pub fn new(number: HexagramNumber) -> Self {
        Self {
            number,
            name: LocalizedText::new(),
            chinese_name: None,
            interpretation: LocalizedText::new(),
            judgement: LocalizedText::new(),
        }
    }

    /// 指定语言的卦名（回退英文）
    pub fn display_name(&self, language: Language) -> &str {
        self.name.resolve(language)
    }

    /// 繁体卦名，空白视为缺失
    pub fn chinese_name(&self) -> Option<&str> {
        self.chinese_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_store_record() {
        let json = r#"{
            "number": 1,
            "name": {"en": "The Creative", "zh": "乾"},
            "chineseName": "乾",
            "interpretation": {"en": "Strength."},
            "judgement": {"en": "Sublime success."},
            "image": {"en": "ignored field"}
        }"#;

        let content: HexagramContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.number.get(), 1);
        assert_eq!(content.display_name(Language::Fr), "The Creative");
        assert_eq!(content.chinese_name(), Some("乾"));
    }

    #[test]
    fn test_invalid_number_rejected() {
        let json = r#"{"number": 65, "name": {"en": "Nope"}}"#;
        assert!(serde_json::from_str::<HexagramContent>(json).is_err());
    }

    #[test]
    fn test_blank_chinese_name_is_absent() {
        let mut content = HexagramContent::new(HexagramNumber::new(2).unwrap());
        content.chinese_name = Some("  ".to_string());
        assert_eq!(content.chinese_name(), None);
    }
}
