//! I Ching Narrator - 卦辞朗读服务

use std::sync::Arc;

use iching_narrator::application::narration::NarrationConfig;
use iching_narrator::application::ports::{HexagramRepositoryPort, SpeechSynthesisPort};
use iching_narrator::config::{load_config, print_config, AppConfig, TtsProvider};
use iching_narrator::domain::narration::ChunkConfig;
use iching_narrator::infrastructure::adapters::{
    ElevenLabsClient, ElevenLabsConfig, FakeSynthesizer, FakeSynthesizerConfig,
};
use iching_narrator::infrastructure::events::EventPublisher;
use iching_narrator::infrastructure::http::{AppState, HttpServer, ServerConfig};
use iching_narrator::infrastructure::memory::{InMemoryAudioHandleStore, InMemoryListenerRegistry};
use iching_narrator::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteHexagramRepository, SqliteReadingRepository,
};
use iching_narrator::infrastructure::persistence::{
    FallbackHexagramRepository, JsonHexagramRepository,
};
use iching_narrator::infrastructure::worker::{IdleSweeper, IdleSweeperConfig};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},iching_narrator={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_synthesizer(config: &AppConfig) -> anyhow::Result<Arc<dyn SpeechSynthesisPort>> {
    match config.tts.provider {
        TtsProvider::ElevenLabs => {
            let api_key = config
                .tts
                .api_key()
                .ok_or_else(|| anyhow::anyhow!("TTS API key is not configured"))?;
            let mut client_config = ElevenLabsConfig::new(api_key)
                .with_base_url(&config.tts.base_url)
                .with_timeout(config.tts.timeout_secs);
            client_config.output_format = config.tts.output_format.clone();
            Ok(Arc::new(ElevenLabsClient::new(client_config)?))
        }
        TtsProvider::Fake => {
            tracing::warn!("Using fake synthesizer, narration audio is placeholder data");
            Ok(Arc::new(FakeSynthesizer::new(FakeSynthesizerConfig::default())))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 优先级：环境变量 > 配置文件 > 默认值
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "I Ching Narrator starting");
    print_config(&config);

    if let Some(parent) = std::path::Path::new(&config.content.database_path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let db_config = DatabaseConfig::new(
        &config.content.database_path,
        config.content.max_connections,
    );
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 静态 JSON：SQLite 为空时导入，查询失败时兜底
    let json_repo = match JsonHexagramRepository::load(&config.content.fallback_json).await {
        Ok(repo) => Arc::new(repo),
        Err(e) => {
            tracing::warn!(error = %e, "Hexagram JSON unavailable, continuing without fallback");
            Arc::new(JsonHexagramRepository::from_records(Vec::new()))
        }
    };
    let sqlite_hexagrams = Arc::new(SqliteHexagramRepository::new(pool.clone()));
    if let Err(e) = sqlite_hexagrams.seed_from(json_repo.as_ref()).await {
        tracing::warn!(error = %e, "Failed to seed hexagram table");
    }
    let hexagram_repo: Arc<dyn HexagramRepositoryPort> =
        Arc::new(FallbackHexagramRepository::new(sqlite_hexagrams, json_repo));
    let reading_repo = Arc::new(SqliteReadingRepository::new(pool));

    let synthesizer = build_synthesizer(&config)?;
    if !synthesizer.health_check().await {
        tracing::warn!("Speech synthesis service is not reachable at startup");
    }

    let audio_store = Arc::new(InMemoryAudioHandleStore::new());
    let event_publisher = Arc::new(EventPublisher::new());
    let narration_config = NarrationConfig {
        max_concurrent_requests: config.tts.max_concurrent_requests,
        chunk: ChunkConfig::default(),
    };
    let listener_registry = Arc::new(InMemoryListenerRegistry::new(
        narration_config,
        hexagram_repo.clone(),
        synthesizer.clone(),
        audio_store.clone(),
        event_publisher.clone(),
    ));

    let sweeper = IdleSweeper::new(
        IdleSweeperConfig {
            idle_timeout_secs: config.playback.idle_timeout_secs,
            sweep_interval_secs: config.playback.sweep_interval_secs,
        },
        listener_registry.clone(),
        event_publisher.clone(),
    );
    tokio::spawn(sweeper.run());

    let state = AppState::new(
        hexagram_repo,
        reading_repo,
        audio_store,
        listener_registry,
        synthesizer,
        event_publisher,
    );
    let server = HttpServer::new(
        ServerConfig::new(&config.server.host, config.server.port),
        state,
    );

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
