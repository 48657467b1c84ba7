//! JSON Persistence - 静态卦内容文件

mod fallback;
mod hexagram_file;

pub use fallback::FallbackHexagramRepository;
pub use hexagram_file::JsonHexagramRepository;
