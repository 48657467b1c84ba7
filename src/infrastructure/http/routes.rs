//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                    GET   健康检查
//! - /api/hexagram/list           GET   列出全部卦（?language=）
//! - /api/hexagram/get            POST  获取卦详情
//! - /api/hexagram/segments       POST  预览朗读片段
//! - /api/narration/request       POST  请求朗读（后台加载，通过 WS 通知）
//! - /api/narration/play          POST  播放 / 继续
//! - /api/narration/pause         POST  暂停
//! - /api/narration/next          POST  下一段
//! - /api/narration/previous      POST  上一段
//! - /api/narration/mute          POST  静音开关
//! - /api/narration/state         POST  当前播放快照
//! - /api/narration/close         POST  关闭会话
//! - /api/narration/event         POST  渲染端回报（ended / time_update）
//! - /api/audio/{handle_id}       GET   读取音频
//! - /api/reading/save            POST  保存起卦记录
//! - /api/reading/list            POST  列出起卦记录
//! - /api/reading/update_note     POST  更新日记
//! - /ws/listener/{listener_id}   WS    听众事件通道

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route(
            "/ws/listener/:listener_id",
            get(handlers::listener_websocket_handler),
        )
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/hexagram", hexagram_routes())
        .nest("/narration", narration_routes())
        .nest("/reading", reading_routes())
        .route("/audio/:handle_id", get(handlers::get_audio))
}

fn hexagram_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(handlers::list_hexagrams))
        .route("/get", post(handlers::get_hexagram))
        .route("/segments", post(handlers::get_hexagram_segments))
}

fn narration_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/request", post(handlers::request_narration))
        .route("/play", post(handlers::play))
        .route("/pause", post(handlers::pause))
        .route("/next", post(handlers::next))
        .route("/previous", post(handlers::previous))
        .route("/mute", post(handlers::set_muted))
        .route("/state", post(handlers::get_state))
        .route("/close", post(handlers::close))
        .route("/event", post(handlers::renderer_event))
}

fn reading_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/save", post(handlers::save_reading))
        .route("/list", post(handlers::list_readings))
        .route("/update_note", post(handlers::update_note))
}
