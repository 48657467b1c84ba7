//! 自由文本分块
//!
//! 按语言的句末标点切句，句子过长时在句中停顿处再切，
//! 然后把短句拼到最小字符数。标点表与规整器共用，行与行之间不合并

use super::normalizer::{is_clause_pause, sentence_stops};
use crate::domain::hexagram::Language;

/// 默认最小字符数
/// 块未达到此长度时，句中停顿不会触发切分
pub const DEFAULT_MIN_CHARS: usize = 20;

/// 分块配置
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// 最小字符数（用于合并短句）
    pub min_chars: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_CHARS,
        }
    }
}

/// 紧跟在断点后、归属前一块的收尾符号
const CLOSING_MARKS: &[char] = &['"', '\'', '\u{201D}', '\u{2019}', '」', '』', ')', '）'];

/// 只含引号或空白的碎片
#[inline]
fn is_quote_fragment(s: &str) -> bool {
    s.chars().all(|c| {
        matches!(
            c,
            '"' | '\'' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}' | '「' | '」' | ' ' | '\t'
        )
    })
}

/// `3.5`、`1,000`、`10:30` 里的标点不是断点
fn is_numeric_separator(chars: &[(usize, char)], i: usize) -> bool {
    matches!(chars[i].1, '.' | ',' | ':')
        && i > 0
        && chars[i - 1].1.is_ascii_digit()
        && chars.get(i + 1).is_some_and(|(_, c)| c.is_ascii_digit())
}

/// 同一语言内块之间的连接符，CJK 直接相连
fn joiner(language: Language) -> &'static str {
    match language {
        Language::Zh | Language::Ja => "",
        Language::En | Language::Hi | Language::Es | Language::Fr => " ",
    }
}

/// 把一行切成句子或子句，返回行内切片
fn split_line(line: &str, language: Language, min_chars: usize) -> Vec<&str> {
    let stops = sentence_stops(language);
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut piece_chars = 0;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i].1;
        piece_chars += 1;

        let breaks = !is_numeric_separator(&chars, i)
            && (stops.contains(&ch) || (is_clause_pause(ch, language) && piece_chars >= min_chars));
        i += 1;

        if breaks {
            // 省略号、连续问叹号和收尾引号留在当前块
            while i < chars.len()
                && (stops.contains(&chars[i].1) || CLOSING_MARKS.contains(&chars[i].1))
            {
                i += 1;
            }
            let end = chars.get(i).map_or(line.len(), |(offset, _)| *offset);
            push_trimmed(&mut pieces, &line[start..end]);
            start = end;
            piece_chars = 0;
        }
    }

    push_trimmed(&mut pieces, &line[start..]);
    pieces
}

fn push_trimmed<'a>(pieces: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        pieces.push(piece);
    }
}

/// 依次累积短块，达到最小字符数就输出；末尾不足的部分并入上一块
fn pack(pieces: Vec<&str>, language: Language, min_chars: usize) -> Vec<String> {
    let sep = joiner(language);
    let mut chunks: Vec<String> = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    let mut pending_chars = 0;

    for piece in pieces {
        pending.push(piece);
        pending_chars += piece.chars().count();
        if pending_chars >= min_chars {
            chunks.push(pending.join(sep));
            pending.clear();
            pending_chars = 0;
        }
    }

    if !pending.is_empty() {
        let tail = pending.join(sep);
        match chunks.last_mut() {
            Some(last) => {
                last.push_str(sep);
                last.push_str(&tail);
            }
            None => chunks.push(tail),
        }
    }

    chunks
}

fn chunk_line(line: &str, language: Language, config: &ChunkConfig) -> Vec<String> {
    pack(split_line(line, language, config.min_chars), language, config.min_chars)
}

/// 对文本分块
///
/// 1. 按行切分，跨行不合并
/// 2. 行内按该语言的标点切分并合并短块
/// 3. 只有引号的碎片并入前一块
pub fn chunk_text(text: &str, language: Language, config: &ChunkConfig) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        for chunk in chunk_line(line, language, config) {
            if is_quote_fragment(&chunk) {
                if let Some(last) = chunks.last_mut() {
                    last.push_str(&chunk);
                }
                continue;
            }
            chunks.push(chunk);
        }
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min(min_chars: usize) -> ChunkConfig {
        ChunkConfig { min_chars }
    }

    #[test]
    fn test_sentence_end_always_splits_then_merges_short() {
        let chunks = chunk_line("短。短？短！", Language::Zh, &min(100));
        assert_eq!(chunks, vec!["短。短？短！".to_string()]);
    }

    #[test]
    fn test_clause_pause_respects_min_chars() {
        let chunks = chunk_line("天行健，君子以自强不息。", Language::Zh, &min(20));
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_clause_pause_splits_long_chunk() {
        let chunks = chunk_line(
            "潜龙勿用阳在下也见龙在田，德施普也终日乾乾反复道也。",
            Language::Zh,
            &min(10),
        );
        assert_eq!(chunks, vec!["潜龙勿用阳在下也见龙在田，", "德施普也终日乾乾反复道也。"]);
    }

    #[test]
    fn test_western_sentences_joined_with_space() {
        let chunks = chunk_text("Rest. Then act with care and patience.", Language::En, &min(20));
        assert_eq!(chunks, vec!["Rest. Then act with care and patience."]);
    }

    #[test]
    fn test_numbers_do_not_split() {
        let chunks = chunk_text("Wait 3.5 days. Begin at 10:30.", Language::En, &min(1));
        assert_eq!(chunks, vec!["Wait 3.5 days.", "Begin at 10:30."]);
    }

    #[test]
    fn test_closing_marks_stay_with_sentence() {
        let chunks = chunk_text("He said \"go.\" Then he waited...", Language::En, &min(1));
        assert_eq!(chunks, vec!["He said \"go.\"", "Then he waited..."]);
    }

    #[test]
    fn test_language_specific_stops() {
        assert_eq!(
            chunk_text("धैर्य रखें। सफलता मिलेगी।", Language::Hi, &min(1)),
            vec!["धैर्य रखें।", "सफलता मिलेगी।"]
        );
        assert_eq!(
            chunk_text("¿Qué buscas? ¡Paciencia!", Language::Es, &min(1)),
            vec!["¿Qué buscas?", "¡Paciencia!"]
        );
        // 西文规则下中文句号不是断点
        assert_eq!(chunk_text("元亨利贞。Go.", Language::En, &min(1)), vec!["元亨利贞。Go."]);
    }

    #[test]
    fn test_lines_never_merge() {
        let chunks = chunk_text("第一行。\n第二行。", Language::Zh, &min(50));
        assert_eq!(chunks, vec!["第一行。", "第二行。"]);
    }

    #[test]
    fn test_quote_fragment_joins_previous() {
        let chunks = chunk_text(
            "这是一段较长的内容测试。\n\"\n这是另一段较长的测试内容。",
            Language::Zh,
            &min(10),
        );
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].ends_with('"'));
    }

    #[test]
    fn test_blank_text_has_no_chunks() {
        assert!(chunk_text(" \n\n  ", Language::En, &ChunkConfig::default()).is_empty());
    }
}
