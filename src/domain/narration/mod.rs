//! Narration Context - 叙述限界上下文
//!
//! 职责:
//! - 文本规整（可朗读化）
//! - 卦内容分段 / 自由文本分块
//! - 各语言叙述句式与音色参数

mod normalizer;
mod phrases;
mod segment_builder;
mod text_chunker;
mod voice_profile;

pub use normalizer::{is_clause_pause, normalize, pause_marks, sentence_stops};
pub use phrases::{phrases, PhraseSet};
pub use segment_builder::{
    build_segments, build_text_segments, segment_texts, NarrationSegment, SegmentKind,
};
pub use text_chunker::{chunk_text, ChunkConfig, DEFAULT_MIN_CHARS};
pub use voice_profile::{voice_profile, VoiceProfile, MULTILINGUAL_MODEL};
