use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tenant_router::config::Config;
use tenant_router::discovery::resolver::resolver_from_config;
use tenant_router::durable::s3::S3Store;
use tenant_router::local::store::LocalStore;
use tenant_router::routing::handlers::build_app;
use tenant_router::routing::router::TenantRouter;
use tenant_router::sync::shutdown::{GracefulOutcome, Shutdown, with_shutdown};
use tenant_router::sync::synchronizer::StateSynchronizer;
use tenant_router::sync::types::release_exit_code;

/// How long open connections get to finish after the first signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // .with_max_level(tracing::Level::DEBUG)
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = Arc::new(Config::from_env()?);

    tracing::info!(
        "Starting customer {} on machine {} (app: {})",
        config.customer_id,
        config.machine_id.as_deref().unwrap_or("unknown"),
        config.app_name.as_deref().unwrap_or("local")
    );
    tracing::info!("Local state file: {:?}", config.database_path);

    // 1. State handoff, before any traffic is accepted:
    let synchronizer = match &config.bucket_name {
        Some(bucket) => {
            tracing::info!("Durable state in bucket {} at {}", bucket, config.s3_endpoint);
            let store = Arc::new(S3Store::from_config(&config)?);
            Some(StateSynchronizer::new(
                store,
                &config.customer_id,
                &config.database_path,
            ))
        }
        None => {
            tracing::warn!("BUCKET_NAME not set, state stays on local disk only");
            None
        }
    };

    if let Some(sync) = &synchronizer {
        let action = sync.startup(config.reset_db).await?;
        tracing::info!("Startup state action: {:?}", action);
    }

    // 2. Shutdown context fed by SIGINT/SIGTERM:
    let shutdown = Shutdown::new();
    shutdown.listen_for_signals();

    // 3. Local state handle and routing:
    let store = Arc::new(LocalStore::new(&config.database_path));
    let router = Arc::new(TenantRouter::new(resolver_from_config(&config)?));
    let app = build_app(config.clone(), store.clone(), router);

    // 4. Serve until the first termination signal:
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server is listening on {}", addr);

    let mut stop_accepting = shutdown.subscribe();
    let mut serving = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                stop_accepting.wait().await;
            })
            .into_future(),
    );

    match with_shutdown(&mut serving, shutdown.subscribe()).await {
        GracefulOutcome::Completed(joined) => joined??,
        GracefulOutcome::ShutdownSignaled(reason) => {
            tracing::info!("Stopped accepting after {}, draining connections", reason);
            if tokio::time::timeout(DRAIN_TIMEOUT, &mut serving).await.is_err() {
                tracing::warn!(
                    "Connections still open after {:?}, dropping them",
                    DRAIN_TIMEOUT
                );
                serving.abort();
            }
        }
    }

    // 5. Check the state back in. Closing first means no visit can land
    // after the snapshot, even on a connection that outlived the drain:
    store.close();
    let code = match &synchronizer {
        Some(sync) => {
            let result = sync.release().await;
            if let Err(e) = &result {
                tracing::error!("Failed to release state for customer {}: {}", config.customer_id, e);
            }
            release_exit_code(&result)
        }
        None => 0,
    };

    std::process::exit(code);
}
