//! TTS Adapter - 语音合成客户端实现

mod elevenlabs_client;
mod fake_synthesizer;

pub use elevenlabs_client::{ElevenLabsClient, ElevenLabsConfig};
pub use fake_synthesizer::{FakeSynthesizer, FakeSynthesizerConfig};
