//! Reading Queries - 起卦记录查询

/// 默认返回条数
pub const DEFAULT_READING_LIMIT: usize = 50;

/// 列出某用户的记录
#[derive(Debug, Clone)]
pub struct ListReadings {
    pub owner_id: String,
    pub limit: Option<usize>,
}
