//! Hexagram Context - Value Objects

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 支持的叙述语言
///
/// 闭集枚举，未知语言代码统一回退到 `En`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
    Hi,
    Es,
    Fr,
    Ja,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::Zh,
        Language::Hi,
        Language::Es,
        Language::Fr,
        Language::Ja,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
            Language::Hi => "hi",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::Ja => "ja",
        }
    }

    /// 解析语言代码（忽略大小写，接受 `zh-CN` / `es_MX` 这类地区后缀）
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "en" => Some(Language::En),
            "zh" => Some(Language::Zh),
            "hi" => Some(Language::Hi),
            "es" => Some(Language::Es),
            "fr" => Some(Language::Fr),
            "ja" => Some(Language::Ja),
            _ => None,
        }
    }

    /// 解析语言代码，不支持的语言回退到英文
    pub fn resolve_code(code: &str) -> Self {
        Self::from_code(code).unwrap_or_else(|| {
            tracing::debug!(code = %code, "Unsupported language code, falling back to en");
            Language::En
        })
    }

    /// 是否使用 CJK 全角标点
    pub fn is_cjk(&self) -> bool {
        matches!(self, Language::Zh | Language::Ja)
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 卦序（1 - 64）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HexagramNumber(u8);

impl HexagramNumber {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 64;

    pub fn new(number: u8) -> Result<Self, &'static str> {
        if !(Self::MIN..=Self::MAX).contains(&number) {
            return Err("卦序必须在 1 到 64 之间");
        }
        Ok(Self(number))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HexagramNumber {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HexagramNumber> for u8 {
    fn from(number: HexagramNumber) -> Self {
        number.0
    }
}

impl std::fmt::Display for HexagramNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 多语言文本
///
/// 每种语言的值都是可选的，`resolve` 时回退到英文，英文也缺失时视为空串
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Option<String>>", into = "BTreeMap<String, String>")]
pub struct LocalizedText(BTreeMap<Language, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// 链式设置某种语言的文本（空白文本被忽略）
    pub fn with(mut self, language: Language, text: impl Into<String>) -> Self {
        self.insert(language, text);
        self
    }

    pub fn insert(&mut self, language: Language, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        self.0.insert(language, text);
    }

    /// 仅取指定语言，不做回退
    pub fn get(&self, language: Language) -> Option<&str> {
        self.0.get(&language).map(String::as_str)
    }

    /// 取指定语言，缺失时回退到英文，英文也缺失时返回空串
    pub fn resolve(&self, language: Language) -> &str {
        if let Some(text) = self.get(language) {
            return text;
        }
        if language != Language::En {
            tracing::trace!(language = %language, "Localized text missing, using en");
        }
        self.get(Language::En).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.0.keys().copied()
    }
}

impl From<BTreeMap<String, Option<String>>> for LocalizedText {
    fn from(raw: BTreeMap<String, Option<String>>) -> Self {
        let mut text = LocalizedText::new();
        for (code, value) in raw {
            // 未知语言键直接丢弃
            let (Some(language), Some(value)) = (Language::from_code(&code), value) else {
                continue;
            };
            text.insert(language, value);
        }
        text
    }
}

impl From<LocalizedText> for BTreeMap<String, String> {
    fn from(text: LocalizedText) -> Self {
        text.0
            .into_iter()
            .map(|(language, value)| (language.as_str().to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_code() {
        assert_eq!(Language::from_code("zh-CN"), Some(Language::Zh));
        assert_eq!(Language::from_code("ES_mx"), Some(Language::Es));
        assert_eq!(Language::from_code(" ja "), Some(Language::Ja));
        assert_eq!(Language::from_code("de"), None);
        assert_eq!(Language::resolve_code("de"), Language::En);
    }

    #[test]
    fn test_hexagram_number_range() {
        assert!(HexagramNumber::new(0).is_err());
        assert!(HexagramNumber::new(65).is_err());
        assert_eq!(HexagramNumber::new(64).unwrap().get(), 64);
    }

    #[test]
    fn test_localized_text_fallback() {
        let text = LocalizedText::new()
            .with(Language::En, "The Creative")
            .with(Language::Zh, "乾");

        assert_eq!(text.resolve(Language::Zh), "乾");
        assert_eq!(text.resolve(Language::Fr), "The Creative");
        assert_eq!(LocalizedText::new().resolve(Language::Fr), "");
    }

    #[test]
    fn test_localized_text_deserialize_ignores_unknown_and_null() {
        let text: LocalizedText =
            serde_json::from_str(r#"{"en": "Peace", "de": "Frieden", "fr": null, "es": "  "}"#)
                .unwrap();

        assert_eq!(text.get(Language::En), Some("Peace"));
        assert_eq!(text.get(Language::Fr), None);
        assert_eq!(text.get(Language::Es), None);
        assert_eq!(text.languages().count(), 1);
    }
}
