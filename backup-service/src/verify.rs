use crate::errors::{Error, Result};
use crate::storage::ObjectStore;
use serde_json::Value;
use tracing::info;

/// Fetches the newest backup under `prefix` and checks that it still
/// deserializes to a readings array. Returns the record count.
pub async fn verify_latest(store: &dyn ObjectStore, prefix: &str) -> Result<usize> {
    let objects = store.list(prefix).await?;
    let latest = objects
        .iter()
        .max_by_key(|obj| obj.last_modified)
        .ok_or_else(|| Error::Validation("no backups found".to_string()))?;

    info!("Found latest backup: {}", latest.key);

    let body = store.get(&latest.key).await?;
    let snapshot: Value = serde_json::from_slice(&body)?;
    let records = snapshot
        .as_array()
        .ok_or_else(|| Error::Validation("invalid backup format: not an array".to_string()))?;

    Ok(records.len())
}
