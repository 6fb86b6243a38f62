use std::env;
use std::path::PathBuf;

/// Runtime configuration, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub http_addr: String,
    pub data_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let http_addr = env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
        let data_file = env::var("DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/bp_readings.json"));

        Self {
            http_addr,
            data_file,
        }
    }
}
