//! Audio Handler - 按句柄读取已合成的音频

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::playback::HandleId;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn get_audio(
    State(state): State<Arc<AppState>>,
    Path(handle_id): Path<String>,
) -> Result<Response, ApiError> {
    let uuid = Uuid::parse_str(&handle_id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid handle id: {}", handle_id)))?;

    let blob = state
        .audio_store
        .resolve(&HandleId::from_uuid(uuid))
        .ok_or_else(|| ApiError::NotFound(format!("Audio handle not found: {}", handle_id)))?;

    Ok((
        [
            (header::CONTENT_TYPE, blob.content_type.clone()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        Body::from(blob.data.as_ref().clone()),
    )
        .into_response())
}
