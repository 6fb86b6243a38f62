//! Manually triggers a backup run on a running backup service.

use serde_json::Value;
use std::process;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let base = std::env::var("BACKUP_SERVICE_URL")
        .unwrap_or_else(|_| "http://localhost:3002".to_string());

    let response = match reqwest::Client::new()
        .post(format!("{base}/trigger-backup"))
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            eprintln!("Failed to trigger backup: {e}");
            process::exit(1);
        }
    };

    let status = response.status();
    let body: Value = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            eprintln!("Failed to read response: {e}");
            process::exit(1);
        }
    };

    if !status.is_success() || body["success"] != true {
        eprintln!("Backup failed: {}", body["error"]);
        process::exit(1);
    }

    println!("Backup created successfully!");
    println!("=========================");
    println!("Filename: {}", body["filename"].as_str().unwrap_or(""));
    println!("URL: {}", body["url"].as_str().unwrap_or(""));
}
