//! Application State
//!
//! 路由共享的端口与 Query/Command Handlers

use std::sync::Arc;

use crate::application::commands::handlers::{SaveReadingHandler, UpdateJournalNoteHandler};
use crate::application::ports::{
    AudioHandleStorePort, HexagramRepositoryPort, ListenerRegistryPort, ReadingRepositoryPort,
    SpeechSynthesisPort,
};
use crate::application::queries::handlers::{
    GetHexagramHandler, ListHexagramsHandler, ListReadingsHandler, PreviewSegmentsHandler,
};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub audio_store: Arc<dyn AudioHandleStorePort>,
    pub listener_registry: Arc<dyn ListenerRegistryPort>,
    pub synthesizer: Arc<dyn SpeechSynthesisPort>,
    pub event_publisher: Arc<EventPublisher>,

    // ========== Command Handlers ==========
    pub save_reading_handler: SaveReadingHandler,
    pub update_note_handler: UpdateJournalNoteHandler,

    // ========== Query Handlers ==========
    pub get_hexagram_handler: GetHexagramHandler,
    pub list_hexagrams_handler: ListHexagramsHandler,
    pub preview_segments_handler: PreviewSegmentsHandler,
    pub list_readings_handler: ListReadingsHandler,
}

impl AppState {
    pub fn new(
        hexagram_repo: Arc<dyn HexagramRepositoryPort>,
        reading_repo: Arc<dyn ReadingRepositoryPort>,
        audio_store: Arc<dyn AudioHandleStorePort>,
        listener_registry: Arc<dyn ListenerRegistryPort>,
        synthesizer: Arc<dyn SpeechSynthesisPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            save_reading_handler: SaveReadingHandler::new(reading_repo.clone()),
            update_note_handler: UpdateJournalNoteHandler::new(reading_repo.clone()),

            get_hexagram_handler: GetHexagramHandler::new(hexagram_repo.clone()),
            list_hexagrams_handler: ListHexagramsHandler::new(hexagram_repo.clone()),
            preview_segments_handler: PreviewSegmentsHandler::new(hexagram_repo),
            list_readings_handler: ListReadingsHandler::new(reading_repo),

            audio_store,
            listener_registry,
            synthesizer,
            event_publisher,
        }
    }
}
