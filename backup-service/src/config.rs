use std::env;

/// Storage key prefix every backup object lives under.
pub const BACKUP_PREFIX: &str = "backups/";

/// Runtime configuration, read from the environment once at startup.
/// AWS credentials come from the standard SDK environment chain.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub schedule: String,
    pub bucket: String,
    pub region: String,
    pub retention_days: i64,
    pub http_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        let api_url = env::var("API_URL").unwrap_or_else(|_| "http://server:3001".to_string());
        // Daily at midnight
        let schedule = env::var("BACKUP_INTERVAL").unwrap_or_else(|_| "0 0 * * *".to_string());
        let bucket = env::var("AWS_BUCKET").unwrap_or_else(|_| "bp-tracker-backups".to_string());
        let region = env::var("AWS_REGION").unwrap_or_else(|_| "ap-southeast-1".to_string());
        let retention_days: i64 = env::var("RETENTION_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);
        let port = env::var("PORT").unwrap_or_else(|_| "3002".to_string());

        Self {
            api_url,
            schedule,
            bucket,
            region,
            retention_days,
            http_addr: format!("0.0.0.0:{port}"),
        }
    }
}
