use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chat_history_api::{config::Config, routes::build_router, state::AppState};
use chat_history_store::{ChatStoreBuilder, StoreBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting chat history API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    tracing::info!("Connecting to {} store", config.store.backend);
    if config.store.backend == StoreBackend::Memory {
        tracing::warn!(
            seed_file = ?config.store.seed_file,
            "Using the in-memory store; chats are not persisted"
        );
    }
    let store = ChatStoreBuilder::new()
        .backend(config.store.backend)
        .table_name(config.store.table_name.clone())
        .region(config.store.region.clone())
        .endpoint_url(config.store.endpoint_url.clone())
        .mongodb_uri(config.mongodb_uri.clone())
        .database(config.mongodb.database.clone())
        .collection(config.mongodb.collection.clone())
        .seed_file(config.store.seed_file.clone())
        .build()
        .await?;
    tracing::info!("Store ready: {}", store.backend_name());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, store));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
