use crate::backup::BackupRunner;
use crate::errors::Result;
use chrono::Utc;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Parses a cron expression. Five-field `node-cron` style expressions are
/// accepted; the `cron` crate wants a leading seconds field, so one is
/// prepended when missing.
pub fn parse_schedule(expr: &str) -> Result<Schedule> {
    let normalized = if expr.split_whitespace().count() == 5 {
        format!("0 {expr}")
    } else {
        expr.to_string()
    };
    Ok(Schedule::from_str(&normalized)?)
}

/// Cancellable periodic backup task. Owns its join handle so shutdown can
/// stop it cleanly.
pub struct Scheduler {
    handle: JoinHandle<()>,
    shutdown: CancellationToken,
}

impl Scheduler {
    pub fn start(schedule: Schedule, runner: Arc<BackupRunner>) -> Self {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let handle = tokio::spawn(async move {
            info!("Backup scheduler started");

            loop {
                let Some(next) = schedule.upcoming(Utc).next() else {
                    warn!("Schedule has no upcoming occurrences, scheduler exiting");
                    return;
                };
                let wait = (next - Utc::now()).to_std().unwrap_or_default();
                info!("Next scheduled backup at {}", next);

                tokio::select! {
                    _ = tokio::time::sleep(wait) => {
                        if let Err(e) = runner.run_with_retry().await {
                            error!("Scheduled backup failed: {}", e);
                        }
                    }
                    _ = token.cancelled() => {
                        info!("Backup scheduler stopped");
                        return;
                    }
                }
            }
        });

        Self { handle, shutdown }
    }

    pub async fn stop(self) {
        self.shutdown.cancel();
        let _ = self.handle.await;
    }
}
