//! 叙述分段
//!
//! 把一条卦内容按固定四段模板转换成有序的朗读片段：
//! 开场 → 核心智慧 → 辅助信息 → 结束语
//!
//! 字段缺失、为空或与前面某段重复时跳过该段；开场和结束语总是存在，
//! 因此结果至少包含一段

use serde::Serialize;

use super::normalizer::normalize;
use super::phrases::phrases;
use super::text_chunker::{chunk_text, ChunkConfig};
use crate::domain::hexagram::{HexagramContent, Language};

/// 片段在模板中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Introduction,
    CoreWisdom,
    SupportingMessage,
    Closing,
    /// 自由文本分块
    Passage,
}

/// 一个朗读片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrationSegment {
    /// 从 0 开始的播放顺序
    pub order: usize,
    pub kind: SegmentKind,
    pub language: Language,
    /// 规整前的原文
    pub raw_text: String,
    /// 规整后的朗读文本（非空）
    pub text: String,
}

/// 按顺序累积片段，丢弃空段和重复段
struct SegmentList {
    language: Language,
    segments: Vec<NarrationSegment>,
    /// 已采用的字段正文（规整后），用于去重
    seen_fields: Vec<String>,
}

impl SegmentList {
    fn new(language: Language) -> Self {
        Self {
            language,
            segments: Vec::with_capacity(4),
            seen_fields: Vec::new(),
        }
    }

    fn push(&mut self, kind: SegmentKind, raw_text: String) {
        let text = normalize(&raw_text, self.language);
        if text.is_empty() {
            return;
        }
        if self.segments.iter().any(|s| s.text == text) {
            tracing::debug!(kind = ?kind, "Duplicate narration segment dropped");
            return;
        }

        self.segments.push(NarrationSegment {
            order: self.segments.len(),
            kind,
            language: self.language,
            raw_text,
            text,
        });
    }

    /// 引语 + 字段正文；正文放在新行，使行首标签能被规整器识别
    fn push_field(&mut self, kind: SegmentKind, framing: &str, field: &str) {
        let body = normalize(field, self.language);
        if body.is_empty() {
            return;
        }
        if self.seen_fields.contains(&body) {
            tracing::debug!(kind = ?kind, "Field repeats earlier content, skipped");
            return;
        }
        self.seen_fields.push(body);
        self.push(kind, format!("{}\n{}", framing, field));
    }

    fn finish(self) -> Vec<NarrationSegment> {
        self.segments
    }
}

/// 为一条卦内容生成朗读片段
///
/// 不支持的语言在调用前已解析为英文；缺失的语言字段回退到英文
pub fn build_segments(content: &HexagramContent, language: Language) -> Vec<NarrationSegment> {
    let phrases = phrases(language);
    let mut list = SegmentList::new(language);

    list.push(
        SegmentKind::Introduction,
        phrases.render_introduction(
            content.number.get(),
            content.display_name(language),
            content.chinese_name(),
        ),
    );

    list.push_field(
        SegmentKind::CoreWisdom,
        phrases.wisdom_intro,
        content.interpretation.resolve(language),
    );

    list.push_field(
        SegmentKind::SupportingMessage,
        phrases.message_intro,
        content.judgement.resolve(language),
    );

    list.push(SegmentKind::Closing, phrases.closing.to_string());

    let segments = list.finish();
    tracing::debug!(
        hexagram = %content.number,
        language = %language,
        count = segments.len(),
        "Narration segments built"
    );
    segments
}

/// 为任意文本生成朗读片段（可能为空）
pub fn build_text_segments(
    text: &str,
    language: Language,
    config: &ChunkConfig,
) -> Vec<NarrationSegment> {
    let mut list = SegmentList::new(language);
    for chunk in chunk_text(text, language, config) {
        list.push(SegmentKind::Passage, chunk);
    }
    list.finish()
}

/// 只取朗读文本
pub fn segment_texts(segments: &[NarrationSegment]) -> Vec<&str> {
    segments.iter().map(|s| s.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hexagram::{HexagramNumber, LocalizedText};

    fn creative() -> HexagramContent {
        let mut content = HexagramContent::new(HexagramNumber::new(1).unwrap());
        content.name = LocalizedText::new()
            .with(Language::En, "The Creative")
            .with(Language::Zh, "乾为天");
        content.chinese_name = Some("乾".to_string());
        content.interpretation = LocalizedText::new().with(
            Language::En,
            "The Creative represents pure yang energy and initiative.",
        );
        content.judgement = LocalizedText::new()
            .with(Language::En, "The Creative works sublime success, furthering through perseverance.");
        content
    }

    #[test]
    fn test_creative_in_english_has_four_segments() {
        let segments = build_segments(&creative(), Language::En);
        assert_eq!(segments.len(), 4);

        let kinds: Vec<SegmentKind> = segments.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Introduction,
                SegmentKind::CoreWisdom,
                SegmentKind::SupportingMessage,
                SegmentKind::Closing
            ]
        );

        assert!(segments[0].text.contains("The Creative"));
        assert!(segments[1]
            .text
            .starts_with(&normalize("Here is the wisdom for you:", Language::En)));
        assert!(segments[1].text.contains("The Creative represents pure yang energy"));
        assert!(segments[2].text.contains("The Creative works sublime success"));
        assert_eq!(
            segments[3].text,
            normalize(phrases(Language::En).closing, Language::En)
        );

        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.order, i);
        }
    }

    #[test]
    fn test_identical_judgement_is_omitted() {
        let mut same = creative();
        same.judgement = LocalizedText::new()
            .with(Language::En, "**The Creative** represents pure yang energy and initiative.");

        let differing = build_segments(&creative(), Language::En);
        let deduped = build_segments(&same, Language::En);

        assert_eq!(deduped.len(), differing.len() - 1);
        assert!(deduped.iter().all(|s| s.kind != SegmentKind::SupportingMessage));
    }

    #[test]
    fn test_missing_fields_reduce_to_intro_and_closing() {
        let mut bare = HexagramContent::new(HexagramNumber::new(12).unwrap());
        bare.name = LocalizedText::new().with(Language::En, "Standstill");

        for language in Language::ALL {
            let segments = build_segments(&bare, language);
            assert_eq!(segments.len(), 2);
            assert_eq!(segments[0].kind, SegmentKind::Introduction);
            assert_eq!(segments[1].kind, SegmentKind::Closing);
        }
    }

    #[test]
    fn test_absent_language_uses_english_data_with_local_templates() {
        let english_only = creative();

        let mut mirrored = creative();
        mirrored.name.insert(Language::Fr, "The Creative");
        mirrored.interpretation.insert(
            Language::Fr,
            english_only.interpretation.resolve(Language::En).to_string(),
        );
        mirrored.judgement.insert(
            Language::Fr,
            english_only.judgement.resolve(Language::En).to_string(),
        );

        let fallback = build_segments(&english_only, Language::Fr);
        let explicit = build_segments(&mirrored, Language::Fr);
        assert_eq!(fallback, explicit);

        assert!(fallback[0].text.starts_with("Vous avez reçu"));
        assert!(fallback.last().unwrap().text.starts_with("Prenez un moment"));
    }

    #[test]
    fn test_segments_never_empty_and_are_normalized() {
        let mut noisy = creative();
        noisy.interpretation = LocalizedText::new().with(Language::En, "  ** ** (Hexagram 2) ");
        noisy.judgement = LocalizedText::new().with(Language::En, "Judgement: *Hold* steady.");

        for language in Language::ALL {
            let segments = build_segments(&noisy, language);
            assert!(!segments.is_empty());
            for segment in &segments {
                assert!(!segment.text.trim().is_empty());
                assert_eq!(normalize(&segment.text, language), segment.text);
            }
        }
    }

    #[test]
    fn test_label_inside_field_is_stripped() {
        let mut labelled = creative();
        labelled.judgement = LocalizedText::new().with(Language::En, "Judgement: Hold steady.");

        let segments = build_segments(&labelled, Language::En);
        assert!(segments[2].text.ends_with("message : Hold steady ."));
    }

    #[test]
    fn test_text_segments() {
        let config = ChunkConfig { min_chars: 20 };
        let segments = build_text_segments(
            "The first passage is long enough.\nThe second passage is long enough.",
            Language::En,
            &config,
        );
        assert_eq!(
            segment_texts(&segments),
            vec![
                "The first passage is long enough .",
                "The second passage is long enough ."
            ]
        );
        assert!(build_text_segments("   ", Language::En, &config).is_empty());
    }
}
