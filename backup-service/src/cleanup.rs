use crate::errors::Result;
use crate::metrics::CLEANUP_DELETED_TOTAL;
use crate::storage::ObjectStore;
use chrono::{Duration, Utc};
use tracing::info;

/// Deletes every backup object strictly older than `now - retention_days`.
/// Returns the number of objects deleted.
///
/// A list or delete failure aborts the rest of this run. The stale objects
/// left behind are picked up again by the next scheduled run, so a partially
/// completed cleanup is accepted.
pub async fn cleanup(store: &dyn ObjectStore, prefix: &str, retention_days: i64) -> Result<usize> {
    let cutoff = Utc::now() - Duration::days(retention_days);
    info!("Starting cleanup of backups older than {}", cutoff);

    let objects = store.list(prefix).await?;
    let stale: Vec<_> = objects
        .into_iter()
        .filter(|obj| obj.last_modified < cutoff)
        .collect();

    info!(
        "Found {} backups older than {} days",
        stale.len(),
        retention_days
    );

    let mut deleted = 0;
    for obj in &stale {
        store.delete(&obj.key).await?;
        CLEANUP_DELETED_TOTAL.inc();
        info!("Deleted old backup: {}", obj.key);
        deleted += 1;
    }

    Ok(deleted)
}
