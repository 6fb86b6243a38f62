use crate::cleanup;
use crate::config::{Config, BACKUP_PREFIX};
use crate::errors::{Error, Result};
use crate::metrics::{BACKUPS_TOTAL, BACKUP_DURATION_SECONDS, BACKUP_FAILURES_TOTAL};
use crate::storage::{BackupObject, ObjectStore};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: u32 = 3;

/// Outcome of a successful backup run.
#[derive(Debug, Clone, Serialize)]
pub struct BackupOutcome {
    pub filename: String,
    pub url: String,
}

/// Fetches the readings snapshot from the upstream API, uploads it to object
/// storage and runs retention cleanup afterwards. Shared by the scheduler
/// and the manual trigger endpoint.
pub struct BackupRunner {
    config: Config,
    client: reqwest::Client,
    store: Arc<dyn ObjectStore>,
}

/// Backup filename for a given instant: the ISO-8601 timestamp with the
/// characters object keys and shells dislike flattened out.
pub fn backup_filename(now: DateTime<Utc>) -> String {
    format!("bp-tracker-backup-{}.json", now.format("%Y-%m-%d_%H-%M-%S"))
}

impl BackupRunner {
    pub fn new(config: Config, store: Arc<dyn ObjectStore>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()?;
        Ok(Self {
            config,
            client,
            store,
        })
    }

    /// One full backup cycle: fetch snapshot, upload, then retention cleanup.
    pub async fn run(&self) -> Result<BackupOutcome> {
        info!("Starting backup process");
        let start = Instant::now();

        let outcome = match self.snapshot_and_upload().await {
            Ok(outcome) => outcome,
            Err(e) => {
                BACKUP_FAILURES_TOTAL.inc();
                return Err(e);
            }
        };

        BACKUPS_TOTAL.inc();
        BACKUP_DURATION_SECONDS.observe(start.elapsed().as_secs_f64());
        info!("Backup uploaded successfully: {}", outcome.url);

        // The backup itself already succeeded; a cleanup failure leaves
        // stale objects for the next run instead of failing the caller.
        match cleanup::cleanup(
            self.store.as_ref(),
            BACKUP_PREFIX,
            self.config.retention_days,
        )
        .await
        {
            Ok(deleted) => info!("Cleanup completed, {} old backups deleted", deleted),
            Err(e) => warn!("Cleanup failed after successful backup: {}", e),
        }

        Ok(outcome)
    }

    /// Scheduled-path wrapper: transient upstream failures are retried with
    /// exponential backoff. The scheduler logs and swallows the final error,
    /// leaving the next scheduled run unaffected.
    pub async fn run_with_retry(&self) -> Result<BackupOutcome> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.run().await {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_retryable() && attempt < MAX_RETRIES => {
                    let backoff_ms = 1000 * 2_u64.pow(attempt - 1);
                    warn!(
                        "Backup attempt {}/{} failed: {}. Retrying in {}ms...",
                        attempt, MAX_RETRIES, e, backoff_ms
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn list_backups(&self) -> Result<Vec<BackupObject>> {
        self.store.list(BACKUP_PREFIX).await
    }

    async fn snapshot_and_upload(&self) -> Result<BackupOutcome> {
        let snapshot = self.fetch_snapshot().await?;
        self.upload_snapshot(&snapshot).await
    }

    async fn fetch_snapshot(&self) -> Result<Value> {
        let url = format!("{}/api/backup", self.config.api_url);
        let snapshot = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(snapshot)
    }

    async fn upload_snapshot(&self, snapshot: &Value) -> Result<BackupOutcome> {
        // A snapshot that is not a readings array must never reach storage.
        let records = snapshot
            .as_array()
            .ok_or_else(|| Error::Validation("snapshot payload is not an array".to_string()))?;

        let body = serde_json::to_vec_pretty(snapshot)?;
        let filename = backup_filename(Utc::now());
        let key = format!("{BACKUP_PREFIX}{filename}");

        info!("Uploading snapshot of {} readings to {}", records.len(), key);
        self.store.put(&key, body, "application/json").await?;

        let url = format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.config.bucket, self.config.region, key
        );
        Ok(BackupOutcome { filename, url })
    }
}
