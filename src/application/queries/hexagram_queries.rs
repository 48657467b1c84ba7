//! Hexagram Queries - 卦内容查询

use crate::domain::hexagram::Language;

/// 获取卦详情
#[derive(Debug, Clone)]
pub struct GetHexagram {
    pub number: u8,
}

/// 列出全部卦
#[derive(Debug, Clone)]
pub struct ListHexagrams;

/// 预览某卦的朗读片段（不合成）
#[derive(Debug, Clone)]
pub struct PreviewSegments {
    pub number: u8,
    pub language: Language,
}
