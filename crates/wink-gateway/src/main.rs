use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;
use wink_core::{Repository, Sequencer};
use wink_gateway::cli::{StorageBackendArg, CLI};
use wink_gateway::{telemetry, App, AppState};
use wink_redirector::{CachedRepository, RedirectorService};
use wink_sequencer::{AtomicSequencer, BlockSequencer};
use wink_shortener::ShortenerService;
use wink_storage::{open_pool, InMemoryRepository, SqliteRepository, SqliteSequenceStore, Sweeper};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    telemetry::init(config.log_format).context("failed to install tracing subscriber")?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        obfuscate = config.obfuscate,
        "starting wink"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            let sequencer = AtomicSequencer::with_offset(config.sequence_start);
            run_server(&config, InMemoryRepository::new(), sequencer).await
        }
        StorageBackendArg::Sqlite => {
            let dsn = config
                .sqlite_dsn
                .as_deref()
                .context("sqlite dsn is required when storage backend is sqlite")?;
            let pool = open_pool(dsn)
                .await
                .with_context(|| format!("failed to open sqlite database {dsn}"))?;

            let repository = SqliteRepository::new(pool.clone());
            repository.migrate().await?;

            let store = SqliteSequenceStore::new(pool);
            store.migrate(config.sequence_start).await?;
            let sequencer = BlockSequencer::new(store, config.sequencer_settings())?;

            run_server(&config, repository, sequencer).await
        }
    }
}

async fn run_server<R: Repository, S: Sequencer>(
    config: &CLI,
    repository: R,
    sequencer: S,
) -> anyhow::Result<()> {
    let repository = Arc::new(CachedRepository::new(repository, config.url_cache()));

    let shortener = ShortenerService::with_codec(
        Arc::clone(&repository),
        Arc::new(sequencer),
        config.codec()?,
    );
    let redirector = RedirectorService::new(Arc::clone(&repository));
    let state = AppState::new(Arc::new(shortener), Arc::new(redirector))
        .with_default_expiration(config.default_expiration()?);

    let (stop_sweeper, sweeper_stopped) = watch::channel(false);
    let sweeper = Sweeper::new(Arc::clone(&repository), config.sweep_interval()).spawn(sweeper_stopped);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "wink server listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The sweeper may already be gone, in which case there is no receiver.
    let _ = stop_sweeper.send(true);
    sweeper.await?;
    info!("wink server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
