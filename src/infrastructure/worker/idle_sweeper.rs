//! Idle Sweeper - 回收空闲听众
//!
//! 定期扫描注册表，关闭超时听众的会话并释放其音频句柄

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::ListenerRegistryPort;
use crate::infrastructure::events::EventPublisher;

/// Sweeper 配置
#[derive(Debug, Clone)]
pub struct IdleSweeperConfig {
    /// 空闲多久后回收（秒）
    pub idle_timeout_secs: u64,
    /// 扫描间隔（秒）
    pub sweep_interval_secs: u64,
}

impl Default for IdleSweeperConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 1800,
            sweep_interval_secs: 60,
        }
    }
}

pub struct IdleSweeper {
    config: IdleSweeperConfig,
    registry: Arc<dyn ListenerRegistryPort>,
    event_publisher: Arc<EventPublisher>,
}

impl IdleSweeper {
    pub fn new(
        config: IdleSweeperConfig,
        registry: Arc<dyn ListenerRegistryPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            config,
            registry,
            event_publisher,
        }
    }

    /// 启动 Sweeper
    pub async fn run(self) {
        tracing::info!(
            idle_timeout_secs = self.config.idle_timeout_secs,
            sweep_interval_secs = self.config.sweep_interval_secs,
            "IdleSweeper started"
        );

        let mut interval =
            tokio::time::interval(Duration::from_secs(self.config.sweep_interval_secs.max(1)));
        // 第一次 tick 立即返回
        interval.tick().await;

        loop {
            interval.tick().await;
            let removed = self.sweep_once().await;
            if removed > 0 {
                tracing::info!(
                    removed = removed,
                    remaining = self.registry.len(),
                    "Idle listeners swept"
                );
            }
        }
    }

    /// 执行一次扫描，返回回收的听众数
    pub async fn sweep_once(&self) -> usize {
        let idle = self
            .registry
            .get_idle_listeners(self.config.idle_timeout_secs);

        let mut removed = 0;
        for listener_id in idle {
            let Some(controller) = self.registry.remove(&listener_id) else {
                continue;
            };
            controller.close().await;
            self.event_publisher
                .publish_listener_closed(&listener_id, "idle timeout");
            self.event_publisher.unregister_listener(&listener_id);
            removed += 1;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::narration::{NarrationConfig, NarrationTarget};
    use crate::application::ports::AudioHandleStorePort;
    use crate::domain::hexagram::Language;
    use crate::infrastructure::adapters::{FakeSynthesizer, FakeSynthesizerConfig};
    use crate::infrastructure::memory::{InMemoryAudioHandleStore, InMemoryListenerRegistry};
    use crate::infrastructure::persistence::JsonHexagramRepository;

    #[tokio::test]
    async fn test_sweep_releases_idle_listener_audio() {
        let store = Arc::new(InMemoryAudioHandleStore::new());
        let publisher = Arc::new(EventPublisher::new());
        let registry = Arc::new(InMemoryListenerRegistry::new(
            NarrationConfig::default(),
            Arc::new(JsonHexagramRepository::from_records(Vec::new())),
            Arc::new(FakeSynthesizer::new(FakeSynthesizerConfig::default())),
            store.clone(),
            publisher.clone(),
        ));

        let controller = registry.get_or_create("sleepy");
        controller
            .request_narration(
                NarrationTarget::Text("A passage that is long enough to speak.".to_string()),
                Language::En,
            )
            .await
            .unwrap();
        assert_eq!(store.live_count(), 1);

        let keep = IdleSweeper::new(
            IdleSweeperConfig {
                idle_timeout_secs: 3600,
                sweep_interval_secs: 60,
            },
            registry.clone(),
            publisher.clone(),
        );
        assert_eq!(keep.sweep_once().await, 0);
        assert_eq!(registry.len(), 1);

        // 超时为 0 时，任何已过去的时间都算空闲
        tokio::time::sleep(Duration::from_millis(5)).await;
        let sweep = IdleSweeper::new(
            IdleSweeperConfig {
                idle_timeout_secs: 0,
                sweep_interval_secs: 60,
            },
            registry.clone(),
            publisher,
        );
        assert_eq!(sweep.sweep_once().await, 1);
        assert!(registry.is_empty());
        assert_eq!(store.live_count(), 0);
    }
}
