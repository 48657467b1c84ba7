//! Ping Handler
//!
//! 健康检查，顺带探测语音合成服务

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::infrastructure::http::state::AppState;

/// Ping 响应
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub tts_available: bool,
    pub listeners: usize,
    pub live_audio_handles: usize,
}

pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    let tts_available = state.synthesizer.health_check().await;
    Json(PingResponse {
        status: if tts_available { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        tts_available,
        listeners: state.listener_registry.len(),
        live_audio_handles: state.audio_store.live_count(),
    })
}
