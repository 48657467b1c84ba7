//! Query Handlers 实现

mod hexagram_handlers;
mod reading_handlers;

pub use hexagram_handlers::*;
pub use reading_handlers::*;
