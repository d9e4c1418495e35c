use catalog_service::error::StartupError;
use catalog_service::storage::{
    Backend, MemoryBackend, PostgresBackend, RedisBackend, StorageError,
};
use catalog_service::{router, AppState, BackendConfig, Config};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

async fn connect_backend(config: &Config) -> Result<Backend, StorageError> {
    let backend: Backend = match &config.backend {
        BackendConfig::Postgres { database_url } => {
            info!("Using PostgreSQL backend");
            Arc::new(
                PostgresBackend::connect(database_url, &config.collection, config.connect_timeout)
                    .await?,
            )
        }
        BackendConfig::Redis { redis_url } => {
            info!("Using Redis backend");
            Arc::new(
                RedisBackend::connect(redis_url, &config.collection, config.connect_timeout)
                    .await?,
            )
        }
        BackendConfig::Memory { seed_path } => {
            let memory = match seed_path {
                Some(path) => MemoryBackend::from_json_file(path).await?,
                None => MemoryBackend::default(),
            };
            info!("Using in-memory backend with {} documents", memory.len());
            Arc::new(memory)
        }
    };

    tokio::time::timeout(config.connect_timeout, backend.ping())
        .await
        .map_err(|_| StorageError::Timeout(config.connect_timeout))??;

    Ok(backend)
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;

    let backend = connect_backend(&config).await?;
    info!("Storage backend connection successful");

    let app = router(AppState {
        backend,
        settings: config.query,
    });

    let addr = config.socket_addr();
    info!("Catalog service starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("catalog_service=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}
