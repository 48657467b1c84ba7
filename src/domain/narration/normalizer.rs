//! 文本规整器
//!
//! 把卦辞字段里的原始文本转换成适合朗读的句子：
//! 1. 去掉行内强调标记（粗体、斜体、代码、链接）
//! 2. 去掉行首的结构化字段标签（如 `judgement:`）
//! 3. 去掉无朗读意义的括号引用（卦序、三爻卦方位）
//! 4. 合并空白
//! 5. 按语言在停顿标点两侧补空格
//! 6. 去掉开头残留的标点
//!
//! 任何输入都不会失败，空输入返回空串

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::hexagram::Language;

// 粗体内容用惰性匹配，允许内嵌斜体
static RE_BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").expect("valid bold regex"));
static RE_ITALIC_STAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\n]+)\*").expect("valid italic regex"));
static RE_ITALIC_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b_([^_\n]+)_\b").expect("valid italic regex"));
static RE_CODE_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`+([^`]+)`+").expect("valid code span regex"));
static RE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").expect("valid link regex"));
static RE_LINE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:#{1,6}|>+|[-*•]|\d+[.)])[ \t]+").expect("valid line marker regex")
});

static RE_FIELD_LABEL: Lazy<Regex> = Lazy::new(|| {
    let labels = FIELD_LABELS.join("|");
    Regex::new(&format!(r"(?im)^[ \t]*(?:(?:{})[ \t]*[:：][ \t]*)+", labels))
        .expect("valid field label regex")
});

static RE_NUMERIC_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)[(\[（【]\s*(?:(?:hexagram\w*|trigram\w*|lines?|卦|#)\s*)?\d+(?:\s*[,/\-–]\s*\d+)*\s*[)\]）】]",
    )
    .expect("valid numeric reference regex")
});
static RE_DIRECTIONAL_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[(（][^()（）]*?\b(?:above|below|over|under)\b[^()（）]*[)）]")
        .expect("valid directional regex")
});
static RE_TRIGRAM_SYMBOLS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[(（][\s\u{2630}-\u{2637}\u{4DC0}-\u{4DFF}]+[)）]").expect("valid trigram regex")
});

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// 行首字段标签闭集（数据录入残留，不朗读）
const FIELD_LABELS: &[&str] = &[
    "the judgement",
    "the judgment",
    "judgement",
    "judgment",
    "the image",
    "image",
    "interpretation",
    "timing",
    "life areas?",
    "guidance",
    "advice",
    "message",
    "wisdom",
    "changing lines?",
    "line [1-6]",
    "keywords?",
    "summary",
    "meaning",
    "jugement",
    "juicio",
    "interpretación",
    "interprétation",
    "卦辞",
    "判断",
    "解读",
    "时机",
    "象曰",
];

const WESTERN_PAUSES: &[char] = &['.', ',', ';', ':', '!', '?'];
const CHINESE_PAUSES: &[char] = &['。', '，', '、', '；', '：', '！', '？'];
const JAPANESE_PAUSES: &[char] = &['。', '、', '！', '？', '：', '；'];
const HINDI_PAUSES: &[char] = &['।', '॥', '.', ',', ';', ':', '!', '?'];
const SPANISH_PAUSES: &[char] = &['.', ',', ';', ':', '!', '?', '¿', '¡'];

const WESTERN_STOPS: &[char] = &['.', '!', '?'];
const CJK_STOPS: &[char] = &['。', '！', '？'];
const HINDI_STOPS: &[char] = &['।', '॥', '.', '!', '?'];

/// 停顿标点中只出现在句首的倒置符号
const OPENING_MARKS: &[char] = &['¿', '¡'];

/// 开头需要去除的非 ASCII 标点
const LEADING_PUNCTUATION: &str = "。，、；：！？「」『』（）【】《》…—–·•¿¡।॥“”‘’";

/// 语言对应的停顿标点集合，未知语言走西文规则
pub fn pause_marks(language: Language) -> &'static [char] {
    match language {
        Language::Zh => CHINESE_PAUSES,
        Language::Ja => JAPANESE_PAUSES,
        Language::Hi => HINDI_PAUSES,
        Language::Es => SPANISH_PAUSES,
        Language::En | Language::Fr => WESTERN_PAUSES,
    }
}

/// 语言对应的句末标点，是停顿标点的子集
pub fn sentence_stops(language: Language) -> &'static [char] {
    match language {
        Language::Zh | Language::Ja => CJK_STOPS,
        Language::Hi => HINDI_STOPS,
        Language::En | Language::Es | Language::Fr => WESTERN_STOPS,
    }
}

/// 句中停顿：停顿标点去掉句末标点和句首倒置符号
pub fn is_clause_pause(ch: char, language: Language) -> bool {
    pause_marks(language).contains(&ch)
        && !sentence_stops(language).contains(&ch)
        && !OPENING_MARKS.contains(&ch)
}

/// 把原始字段文本规整为可朗读文本
///
/// 结果是不动点：对输出再次调用会得到相同文本。
/// 前一轮的去除可能让新的标签暴露在开头，所以重复到输出不再变化；
/// 第一轮之后每轮只会删除字符，循环必然结束
pub fn normalize(text: &str, language: Language) -> String {
    let mut current = normalize_once(text, language);
    loop {
        let next = normalize_once(&current, language);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(text: &str, language: Language) -> String {
    let text = strip_markup(text);
    let text = RE_FIELD_LABEL.replace_all(&text, "");
    let text = strip_cross_references(&text);
    let text = collapse_whitespace(&text);
    let text = shape_pauses(&text, pause_marks(language));
    strip_leading_punctuation(&text).to_string()
}

fn strip_markup(text: &str) -> String {
    let text = RE_LINE_MARKER.replace_all(text, "");
    let text = RE_LINK.replace_all(&text, "$1");
    let text = RE_BOLD.replace_all(&text, "$1$2");
    let text = RE_ITALIC_STAR.replace_all(&text, "$1");
    let text = RE_ITALIC_UNDERSCORE.replace_all(&text, "$1");
    RE_CODE_SPAN.replace_all(&text, "$1").into_owned()
}

fn strip_cross_references(text: &str) -> String {
    let text = RE_NUMERIC_REFERENCE.replace_all(text, " ");
    let text = RE_TRIGRAM_SYMBOLS.replace_all(&text, " ");
    RE_DIRECTIONAL_PAIR.replace_all(&text, " ").into_owned()
}

fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// 在停顿标点两侧各补一个空格，然后重新合并空白
///
/// 数字中间的 `.` `,` `:`（如 `3.5`、`10:30`）保持原样
fn shape_pauses(text: &str, marks: &[char]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut shaped = String::with_capacity(text.len() + text.len() / 4);

    for (i, &ch) in chars.iter().enumerate() {
        if !marks.contains(&ch) {
            shaped.push(ch);
            continue;
        }

        let between_digits = matches!(ch, '.' | ',' | ':')
            && i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit());

        if between_digits {
            shaped.push(ch);
        } else {
            shaped.push(' ');
            shaped.push(ch);
            shaped.push(' ');
        }
    }

    collapse_whitespace(&shaped)
}

#[inline]
fn is_leading_noise(ch: char) -> bool {
    ch.is_whitespace() || ch.is_ascii_punctuation() || LEADING_PUNCTUATION.contains(ch)
}

fn strip_leading_punctuation(text: &str) -> &str {
    text.trim_start_matches(is_leading_noise)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace_input() {
        assert_eq!(normalize("", Language::En), "");
        assert_eq!(normalize("   \n\t ", Language::Zh), "");
        assert_eq!(normalize("**  **", Language::En), "");
    }

    #[test]
    fn test_strips_emphasis_markup() {
        let text = "The **Creative** is _strong_ and `firm`, see [the sage](https://x.y).";
        assert_eq!(
            normalize(text, Language::En),
            "The Creative is strong and firm , see the sage ."
        );
    }

    #[test]
    fn test_strips_italic_nested_in_bold() {
        assert_eq!(normalize("**a *b* c** done.", Language::En), "a b c done .");
        assert_eq!(normalize("***Hold*** firm.", Language::En), "Hold firm .");
    }

    #[test]
    fn test_strips_stacked_field_labels() {
        let text = "judgement: judgement: judgement: judgement: judgement: Hold.";
        assert_eq!(normalize(text, Language::En), "Hold .");
    }

    #[test]
    fn test_strips_field_labels_case_insensitively() {
        let text = "Judgement: Sublime success.\nTIMING: Act now.\nLife area: Career.";
        assert_eq!(
            normalize(text, Language::En),
            "Sublime success . Act now . Career ."
        );
    }

    #[test]
    fn test_label_only_stripped_at_line_start() {
        let text = "Trust your judgement: it is sound.";
        assert_eq!(
            normalize(text, Language::En),
            "Trust your judgement : it is sound ."
        );
    }

    #[test]
    fn test_removes_cross_references() {
        let text = "Heaven (Hexagram 1) moves [12] while Earth (Water above Heaven) rests (☰ ☷).";
        assert_eq!(
            normalize(text, Language::En),
            "Heaven moves while Earth rests ."
        );
    }

    #[test]
    fn test_cjk_pause_shaping() {
        let text = "乾：元亨利贞。君子以自强不息，终日乾乾！";
        assert_eq!(
            normalize(text, Language::Zh),
            "乾 ： 元亨利贞 。 君子以自强不息 ， 终日乾乾 ！"
        );
    }

    #[test]
    fn test_western_rule_leaves_cjk_marks_alone() {
        let text = "元亨利贞。Go.";
        assert_eq!(normalize(text, Language::Fr), "元亨利贞。Go .");
    }

    #[test]
    fn test_digits_keep_inner_punctuation() {
        assert_eq!(
            normalize("Wait 3.5 days, until 10:30.", Language::En),
            "Wait 3.5 days , until 10:30 ."
        );
    }

    #[test]
    fn test_removes_leading_punctuation() {
        assert_eq!(normalize(", — and so: rest.", Language::En), "and so : rest .");
        assert_eq!(normalize("¿Qué buscas?", Language::Es), "Qué buscas ?");
    }

    #[test]
    fn test_sentence_stops_are_pauses() {
        for language in Language::ALL {
            for stop in sentence_stops(language) {
                assert!(pause_marks(language).contains(stop), "{:?} {}", language, stop);
            }
        }
        assert!(is_clause_pause('，', Language::Zh));
        assert!(!is_clause_pause('。', Language::Zh));
        assert!(!is_clause_pause('¿', Language::Es));
        assert!(!is_clause_pause('，', Language::En));
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            ("**Judgement**: The Creative works *sublime* success.", Language::En),
            (": judgement: hidden label", Language::En),
            ("Interpretación: ¡Perseverancia!  (Hexagrama 3)", Language::Es),
            ("Trust your judgement: it is sound.", Language::En),
            ("象曰：天行健，君子以自强不息。", Language::Zh),
            ("धैर्य रखें। सफलता मिलेगी॥", Language::Hi),
            ("# Heading\n- bullet one\n- bullet two", Language::Ja),
            ("...3.5, then 4", Language::Fr),
            (
                "judgement: judgement: judgement: judgement: judgement: judgement: Hold.",
                Language::En,
            ),
            (": wisdom: : message: :: timing: advice: guidance: Rest.", Language::En),
            ("**a *b* c** done.", Language::En),
        ];

        for (text, language) in samples {
            let once = normalize(text, language);
            let twice = normalize(&once, language);
            assert_eq!(once, twice, "not a fixed point for {:?}", text);
        }
    }

    #[test]
    fn test_hidden_label_exposed_by_leading_punctuation() {
        assert_eq!(normalize(": judgement: hidden label", Language::En), "hidden label");
    }
}
