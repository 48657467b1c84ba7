//! Reading Handlers - 起卦记录与日记

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::commands::{SaveReading, UpdateJournalNote};
use crate::application::queries::ListReadings;
use crate::infrastructure::http::dto::{
    parse_language, ApiResponse, ListReadingsRequest, ReadingResponse, SaveReadingRequest,
    UpdateNoteRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn save_reading(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveReadingRequest>,
) -> Result<Json<ApiResponse<ReadingResponse>>, ApiError> {
    let cmd = SaveReading {
        owner_id: req.owner_id,
        hexagram_number: req.hexagram_number,
        changing_lines: req.changing_lines,
        question: req.question,
        journal_note: req.journal_note,
        language: parse_language(&req.language),
    };

    let record = state.save_reading_handler.handle(cmd).await?;
    Ok(Json(ApiResponse::success(record.into())))
}

pub async fn list_readings(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListReadingsRequest>,
) -> Result<Json<ApiResponse<Vec<ReadingResponse>>>, ApiError> {
    let records = state
        .list_readings_handler
        .handle(ListReadings {
            owner_id: req.owner_id,
            limit: req.limit,
        })
        .await?;

    Ok(Json(ApiResponse::success(
        records.into_iter().map(ReadingResponse::from).collect(),
    )))
}

pub async fn update_note(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<Json<ApiResponse<ReadingResponse>>, ApiError> {
    let cmd = UpdateJournalNote {
        owner_id: req.owner_id,
        reading_id: req.id,
        journal_note: req.journal_note,
    };

    let record = state.update_note_handler.handle(cmd).await?;
    Ok(Json(ApiResponse::success(record.into())))
}
