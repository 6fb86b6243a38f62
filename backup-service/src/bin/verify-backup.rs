//! Fetches the latest backup from the bucket and checks that it is a valid
//! readings snapshot. Exits non-zero on failure, for use in monitoring jobs.

use bp_backup_service::config::{Config, BACKUP_PREFIX};
use bp_backup_service::storage::S3Store;
use bp_backup_service::verify;
use std::process;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let store = S3Store::connect(config.bucket, config.region).await;

    match verify::verify_latest(&store, BACKUP_PREFIX).await {
        Ok(count) => {
            println!("Backup verified successfully: {count} records found");
        }
        Err(e) => {
            eprintln!("Verification failed: {e}");
            process::exit(1);
        }
    }
}
