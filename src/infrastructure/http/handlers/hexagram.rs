//! Hexagram Handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::queries::{GetHexagram, ListHexagrams, PreviewSegments};
use crate::domain::hexagram::HexagramContent;
use crate::infrastructure::http::dto::{
    parse_language, ApiResponse, GetHexagramRequest, HexagramSegmentsRequest, HexagramSummary,
    SegmentsResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListHexagramsParams {
    pub language: Option<String>,
}

pub async fn list_hexagrams(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListHexagramsParams>,
) -> Result<Json<ApiResponse<Vec<HexagramSummary>>>, ApiError> {
    let language = parse_language(params.language.as_deref().unwrap_or_default());
    let hexagrams = state.list_hexagrams_handler.handle(ListHexagrams).await?;

    let summaries = hexagrams
        .iter()
        .map(|h| HexagramSummary::from_content(h, language))
        .collect();
    Ok(Json(ApiResponse::success(summaries)))
}

pub async fn get_hexagram(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetHexagramRequest>,
) -> Result<Json<ApiResponse<HexagramContent>>, ApiError> {
    let content = state
        .get_hexagram_handler
        .handle(GetHexagram { number: req.number })
        .await?;
    Ok(Json(ApiResponse::success(content)))
}

/// 预览朗读片段，不触发合成
pub async fn get_hexagram_segments(
    State(state): State<Arc<AppState>>,
    Json(req): Json<HexagramSegmentsRequest>,
) -> Result<Json<ApiResponse<SegmentsResponse>>, ApiError> {
    let language = parse_language(&req.language);
    let segments = state
        .preview_segments_handler
        .handle(PreviewSegments {
            number: req.number,
            language,
        })
        .await?;

    Ok(Json(ApiResponse::success(SegmentsResponse {
        number: req.number,
        language,
        total: segments.len(),
        segments,
    })))
}
