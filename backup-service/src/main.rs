use bp_backup_service::backup::BackupRunner;
use bp_backup_service::config::Config;
use bp_backup_service::scheduler::{parse_schedule, Scheduler};
use bp_backup_service::storage::S3Store;
use bp_backup_service::{metrics, rest};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = Config::from_env();

    info!("Starting bp-tracker backup service");
    info!("Upstream API: {}", config.api_url);
    info!("Bucket: {} ({})", config.bucket, config.region);
    info!("Retention: {} days", config.retention_days);
    info!("Backup schedule: {}", config.schedule);

    // Initialize metrics
    metrics::init_metrics();

    let schedule = match parse_schedule(&config.schedule) {
        Ok(schedule) => schedule,
        Err(e) => {
            error!("Invalid BACKUP_INTERVAL '{}': {}", config.schedule, e);
            std::process::exit(1);
        }
    };

    let store = Arc::new(S3Store::connect(config.bucket.clone(), config.region.clone()).await);
    let runner = match BackupRunner::new(config.clone(), store) {
        Ok(runner) => Arc::new(runner),
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let scheduler = Scheduler::start(schedule, runner.clone());

    let app = rest::create_router(runner);

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {}: {}", config.http_addr, e);
            std::process::exit(1);
        });

    info!("Backup service listening on {}", config.http_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap_or_else(|e| {
            error!("HTTP server error: {}", e);
        });
    });

    tokio::select! {
        _ = server_handle => {
            error!("HTTP server terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    scheduler.stop().await;
    info!("Shutting down");
}
