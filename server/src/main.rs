use bp_server::config::Config;
use bp_server::{rest, store};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = Config::from_env();

    info!("Starting bp-tracker readings server");
    info!("HTTP server: {}", config.http_addr);
    info!("Data file: {}", config.data_file.display());

    // Spawn the store actor that owns the data file
    let store = match store::spawn_store(config.data_file.clone()).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to initialize data file: {}", e);
            std::process::exit(1);
        }
    };

    let app = rest::create_router(store);

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {}: {}", config.http_addr, e);
            std::process::exit(1);
        });

    info!("HTTP server listening on {}", config.http_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap_or_else(|e| {
            error!("HTTP server error: {}", e);
        });
    });

    tokio::select! {
        _ = server_handle => {
            error!("HTTP server terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down");
}
