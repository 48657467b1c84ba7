//! In-Memory Listener Registry Implementation

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::narration::{NarrationConfig, NarrationController};
use crate::application::ports::{
    AudioHandleStorePort, HexagramRepositoryPort, ListenerRegistryPort, SpeechSynthesisPort,
};
use crate::infrastructure::events::{EventPublisher, EventRenderer};

struct ListenerEntry {
    controller: Arc<NarrationController>,
    last_activity: DateTime<Utc>,
}

/// 内存听众注册表
///
/// 新听众的控制器共享同一组合成器、句柄存储和内容仓储
pub struct InMemoryListenerRegistry {
    listeners: DashMap<String, ListenerEntry>,
    config: NarrationConfig,
    hexagrams: Arc<dyn HexagramRepositoryPort>,
    synthesizer: Arc<dyn SpeechSynthesisPort>,
    store: Arc<dyn AudioHandleStorePort>,
    publisher: Arc<EventPublisher>,
}

impl InMemoryListenerRegistry {
    pub fn new(
        config: NarrationConfig,
        hexagrams: Arc<dyn HexagramRepositoryPort>,
        synthesizer: Arc<dyn SpeechSynthesisPort>,
        store: Arc<dyn AudioHandleStorePort>,
        publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            listeners: DashMap::new(),
            config,
            hexagrams,
            synthesizer,
            store,
            publisher,
        }
    }

    fn build_controller(&self, listener_id: &str) -> Arc<NarrationController> {
        let renderer = Arc::new(EventRenderer::new(listener_id, self.publisher.clone()));
        Arc::new(NarrationController::new(
            listener_id,
            self.config.clone(),
            self.hexagrams.clone(),
            self.synthesizer.clone(),
            self.store.clone(),
            renderer,
        ))
    }
}

impl ListenerRegistryPort for InMemoryListenerRegistry {
    fn get_or_create(&self, listener_id: &str) -> Arc<NarrationController> {
        let mut entry = self
            .listeners
            .entry(listener_id.to_string())
            .or_insert_with(|| {
                tracing::info!(listener_id = %listener_id, "Listener registered");
                ListenerEntry {
                    controller: self.build_controller(listener_id),
                    last_activity: Utc::now(),
                }
            });
        entry.last_activity = Utc::now();
        entry.controller.clone()
    }

    fn get(&self, listener_id: &str) -> Option<Arc<NarrationController>> {
        self.listeners.get_mut(listener_id).map(|mut entry| {
            entry.last_activity = Utc::now();
            entry.controller.clone()
        })
    }

    fn touch(&self, listener_id: &str) {
        if let Some(mut entry) = self.listeners.get_mut(listener_id) {
            entry.last_activity = Utc::now();
        }
    }

    fn remove(&self, listener_id: &str) -> Option<Arc<NarrationController>> {
        self.listeners.remove(listener_id).map(|(_, entry)| {
            tracing::info!(listener_id = %listener_id, "Listener removed");
            entry.controller
        })
    }

    fn get_idle_listeners(&self, idle_timeout_secs: u64) -> Vec<String> {
        let now = Utc::now();
        let timeout = chrono::Duration::seconds(idle_timeout_secs as i64);

        self.listeners
            .iter()
            .filter_map(|entry| {
                let elapsed = now - entry.last_activity;
                if elapsed > timeout {
                    Some(entry.key().clone())
                } else {
                    None
                }
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.listeners.len()
    }
}
