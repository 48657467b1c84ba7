//! Reading Commands - 起卦记录相关命令

use uuid::Uuid;

use crate::domain::hexagram::Language;

/// 保存一次起卦
#[derive(Debug, Clone)]
pub struct SaveReading {
    pub owner_id: String,
    pub hexagram_number: u8,
    pub changing_lines: Vec<u8>,
    pub question: Option<String>,
    pub journal_note: Option<String>,
    pub language: Language,
}

/// 更新日记
#[derive(Debug, Clone)]
pub struct UpdateJournalNote {
    pub owner_id: String,
    pub reading_id: Uuid,
    /// `None` 或空白表示清空
    pub journal_note: Option<String>,
}
