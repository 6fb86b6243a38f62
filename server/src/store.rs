use crate::errors::{Error, Result};
use crate::model::{NewReading, Reading, ReadingPatch};
use crate::validate::validate;
use chrono::Utc;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{mpsc, oneshot};
use tracing::info;

const CHANNEL_CAPACITY: usize = 64;

/// Commands accepted by the store actor. Every operation on the data file is
/// funnelled through the single actor task, so a read-modify-write cycle can
/// never interleave with another writer.
enum Command {
    List(oneshot::Sender<Result<Vec<Reading>>>),
    Create(NewReading, oneshot::Sender<Result<Reading>>),
    Update(String, ReadingPatch, oneshot::Sender<Result<Reading>>),
    Delete(String, oneshot::Sender<Result<()>>),
    Export(oneshot::Sender<Result<String>>),
    Import(Value, oneshot::Sender<Result<usize>>),
}

/// Cloneable handle to the store actor.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<Command>,
}

/// Initializes the data file and spawns the store actor that owns it.
pub async fn spawn_store(data_file: PathBuf) -> Result<StoreHandle> {
    init_data_file(&data_file).await?;
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::spawn(run_store(rx, data_file));
    Ok(StoreHandle { tx })
}

impl StoreHandle {
    pub async fn list(&self) -> Result<Vec<Reading>> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::List(tx)).await?;
        rx.await.map_err(|_| Error::Channel)?
    }

    pub async fn create(&self, reading: NewReading) -> Result<Reading> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Create(reading, tx)).await?;
        rx.await.map_err(|_| Error::Channel)?
    }

    pub async fn update(&self, id: &str, patch: ReadingPatch) -> Result<Reading> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Update(id.to_string(), patch, tx)).await?;
        rx.await.map_err(|_| Error::Channel)?
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Delete(id.to_string(), tx)).await?;
        rx.await.map_err(|_| Error::Channel)?
    }

    /// Raw persisted document, for the backup download endpoint.
    pub async fn export(&self) -> Result<String> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Export(tx)).await?;
        rx.await.map_err(|_| Error::Channel)?
    }

    /// Replaces the whole collection. Returns the number of records imported.
    pub async fn import(&self, records: Value) -> Result<usize> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Import(records, tx)).await?;
        rx.await.map_err(|_| Error::Channel)?
    }

    async fn send(&self, cmd: Command) -> Result<()> {
        self.tx.send(cmd).await.map_err(|_| Error::Channel)
    }
}

async fn run_store(mut rx: mpsc::Receiver<Command>, data_file: PathBuf) {
    info!("Readings store started (data file: {})", data_file.display());

    while let Some(cmd) = rx.recv().await {
        match cmd {
            Command::List(reply) => {
                let _ = reply.send(load(&data_file).await);
            }
            Command::Create(reading, reply) => {
                let _ = reply.send(create(&data_file, reading).await);
            }
            Command::Update(id, patch, reply) => {
                let _ = reply.send(update(&data_file, &id, patch).await);
            }
            Command::Delete(id, reply) => {
                let _ = reply.send(delete(&data_file, &id).await);
            }
            Command::Export(reply) => {
                let _ = reply.send(fs::read_to_string(&data_file).await.map_err(Error::Io));
            }
            Command::Import(records, reply) => {
                let _ = reply.send(import(&data_file, records).await);
            }
        }
    }

    info!("Readings store stopped");
}

async fn init_data_file(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await?;
    }
    if !fs::try_exists(path).await? {
        fs::write(path, "[]").await?;
        info!("Initialized data file at {}", path.display());
    }
    Ok(())
}

async fn load(path: &Path) -> Result<Vec<Reading>> {
    let raw = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write-then-rename, so a concurrent exporter never sees a half-written
/// document.
async fn persist(path: &Path, readings: &[Reading]) -> Result<()> {
    let raw = serde_json::to_string_pretty(readings)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, raw).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

async fn create(path: &Path, new: NewReading) -> Result<Reading> {
    let reading = Reading {
        // The original client derives ids from the creation time in epoch
        // milliseconds; keep the same scheme for server-assigned ids.
        id: new
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Utc::now().timestamp_millis().to_string()),
        timestamp: new.timestamp.unwrap_or_else(|| Utc::now().to_rfc3339()),
        systolic: new.systolic,
        diastolic: new.diastolic,
        pulse: new.pulse,
        notes: new.notes,
    };
    validate(&reading)?;

    let mut readings = load(path).await?;
    readings.push(reading.clone());
    persist(path, &readings).await?;
    Ok(reading)
}

async fn update(path: &Path, id: &str, patch: ReadingPatch) -> Result<Reading> {
    let mut readings = load(path).await?;
    let reading = readings
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;

    if let Some(timestamp) = patch.timestamp {
        reading.timestamp = timestamp;
    }
    if let Some(systolic) = patch.systolic {
        reading.systolic = systolic;
    }
    if let Some(diastolic) = patch.diastolic {
        reading.diastolic = diastolic;
    }
    if let Some(pulse) = patch.pulse {
        reading.pulse = pulse;
    }
    if let Some(notes) = patch.notes {
        reading.notes = notes;
    }

    // The merged record must pass the same checks as a fresh create.
    let updated = reading.clone();
    validate(&updated)?;
    persist(path, &readings).await?;
    Ok(updated)
}

/// Deleting an unknown id is a success (idempotent).
async fn delete(path: &Path, id: &str) -> Result<()> {
    let mut readings = load(path).await?;
    let before = readings.len();
    readings.retain(|r| r.id != id);

    if readings.len() != before {
        persist(path, &readings).await?;
    }
    Ok(())
}

async fn import(path: &Path, records: Value) -> Result<usize> {
    if !records.is_array() {
        return Err(Error::Validation(
            "import payload is not an array".to_string(),
        ));
    }

    let readings: Vec<Reading> = serde_json::from_value(records).map_err(|e| {
        Error::Validation(format!("import payload is not a list of readings: {e}"))
    })?;

    persist(path, &readings).await?;
    Ok(readings.len())
}
