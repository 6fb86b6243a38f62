use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref BACKUPS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "backup_runs_total",
        "Total successful backup uploads"
    ))
    .unwrap();
    pub static ref BACKUP_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "backup_failures_total",
        "Total failed backup attempts"
    ))
    .unwrap();
    pub static ref CLEANUP_DELETED_TOTAL: Counter = Counter::with_opts(Opts::new(
        "backup_cleanup_deleted_total",
        "Total old backup objects deleted by retention cleanup"
    ))
    .unwrap();
    pub static ref BACKUP_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "backup_duration_seconds",
            "Time taken to fetch and upload a backup"
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0])
    )
    .unwrap();
}

pub fn init_metrics() {
    REGISTRY.register(Box::new(BACKUPS_TOTAL.clone())).unwrap();
    REGISTRY
        .register(Box::new(BACKUP_FAILURES_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(CLEANUP_DELETED_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(BACKUP_DURATION_SECONDS.clone()))
        .unwrap();
}

pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}
