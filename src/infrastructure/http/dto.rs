//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::ReadingRecord;
use crate::domain::hexagram::{HexagramContent, Language};
use crate::domain::narration::NarrationSegment;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

/// 语言代码，未知或缺省时回退英文
fn default_language() -> String {
    Language::En.as_str().to_string()
}

pub fn parse_language(code: &str) -> Language {
    Language::resolve_code(code)
}

// ============================================================================
// Hexagram DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GetHexagramRequest {
    pub number: u8,
}

#[derive(Debug, Deserialize)]
pub struct HexagramSegmentsRequest {
    pub number: u8,
    #[serde(default = "default_language")]
    pub language: String,
}

/// 列表中的卦摘要
#[derive(Debug, Serialize)]
pub struct HexagramSummary {
    pub number: u8,
    pub name: String,
    pub chinese_name: Option<String>,
}

impl HexagramSummary {
    pub fn from_content(content: &HexagramContent, language: Language) -> Self {
        Self {
            number: content.number.get(),
            name: content.display_name(language).to_string(),
            chinese_name: content.chinese_name().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SegmentsResponse {
    pub number: u8,
    pub language: Language,
    pub total: usize,
    pub segments: Vec<NarrationSegment>,
}

// ============================================================================
// Narration DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NarrationRequest {
    pub listener_id: String,
    /// 卦号与自由文本二选一
    pub hexagram_number: Option<u8>,
    pub text: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct NarrationStartedResponse {
    pub session_id: String,
    pub total_segments: usize,
}

#[derive(Debug, Deserialize)]
pub struct ListenerRequest {
    pub listener_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MuteRequest {
    pub listener_id: String,
    pub muted: bool,
}

/// 浏览器端回报的播放事件
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RendererEvent {
    Ended {
        segment_index: usize,
    },
    TimeUpdate {
        segment_index: usize,
        current_time: f64,
        duration: f64,
    },
}

#[derive(Debug, Deserialize)]
pub struct RendererEventRequest {
    pub listener_id: String,
    pub session_id: Uuid,
    #[serde(flatten)]
    pub event: RendererEvent,
}

// ============================================================================
// Reading DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SaveReadingRequest {
    pub owner_id: String,
    pub hexagram_number: u8,
    #[serde(default)]
    pub changing_lines: Vec<u8>,
    pub question: Option<String>,
    pub journal_note: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct ListReadingsRequest {
    pub owner_id: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub owner_id: String,
    pub id: Uuid,
    pub journal_note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReadingResponse {
    pub id: Uuid,
    pub hexagram_number: u8,
    pub changing_lines: Vec<u8>,
    pub question: Option<String>,
    pub journal_note: Option<String>,
    pub language: Language,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ReadingRecord> for ReadingResponse {
    fn from(record: ReadingRecord) -> Self {
        Self {
            id: record.id,
            hexagram_number: record.hexagram_number.get(),
            changing_lines: record.changing_lines,
            question: record.question,
            journal_note: record.journal_note,
            language: record.language,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_event_shapes() {
        let ended: RendererEventRequest = serde_json::from_value(serde_json::json!({
            "listener_id": "l1",
            "session_id": Uuid::nil(),
            "kind": "ended",
            "segment_index": 2
        }))
        .unwrap();
        assert!(matches!(
            ended.event,
            RendererEvent::Ended { segment_index: 2 }
        ));

        let tick: RendererEventRequest = serde_json::from_value(serde_json::json!({
            "listener_id": "l1",
            "session_id": Uuid::nil(),
            "kind": "time_update",
            "segment_index": 0,
            "current_time": 1.5,
            "duration": 4.0
        }))
        .unwrap();
        assert!(matches!(tick.event, RendererEvent::TimeUpdate { .. }));
    }

    #[test]
    fn test_language_defaults_to_english() {
        let req: NarrationRequest =
            serde_json::from_value(serde_json::json!({ "listener_id": "l1", "text": "hi" }))
                .unwrap();
        assert_eq!(parse_language(&req.language), Language::En);
        assert_eq!(parse_language("zh-TW"), Language::Zh);
        assert_eq!(parse_language("klingon"), Language::En);
    }
}
