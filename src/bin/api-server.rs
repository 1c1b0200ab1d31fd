//! Brickcloud API Server
//!
//! HTTP API serving Renko + Ichimoku backtests over exchange candle history.
//! Every request carries its own configuration, so instances can be scaled
//! horizontally.

use brickcloud::config::{get_environment, get_market_data_url, get_port};
use brickcloud::core::http::start_server;
use brickcloud::logging;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let port = get_port();
    let env = get_environment();
    info!("Starting Brickcloud API Server");
    info!(environment = %env, "Environment");
    info!(market_data_url = %get_market_data_url(), "Market data source");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
