//! One-shot retention cleanup run against the configured bucket.

use bp_backup_service::cleanup;
use bp_backup_service::config::{Config, BACKUP_PREFIX};
use bp_backup_service::storage::S3Store;
use std::process;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let store = S3Store::connect(config.bucket, config.region).await;

    match cleanup::cleanup(&store, BACKUP_PREFIX, config.retention_days).await {
        Ok(deleted) => {
            println!("Cleanup completed successfully, {deleted} backups deleted");
        }
        Err(e) => {
            eprintln!("Cleanup failed: {e}");
            process::exit(1);
        }
    }
}
