//! InvestMal API Server
//!
//! Serves text generation (`/ai/generate`) and signal analysis (`/signals/analyze`).
//! The service keeps no per-request state and can be horizontally scaled.

use dotenvy::dotenv;
use investmal::config::Config;
use investmal::core::http::start_server;
use investmal::logging;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    let config = Config::from_env()?;
    logging::init_logging(&config);

    info!("Starting InvestMal API Server");
    info!(environment = %config.environment, debug = config.debug, "Environment");
    info!(default_model = %config.default_model, max_tokens = config.max_tokens, "Model defaults");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        result = start_server(&config) => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server error");
                return Err(e);
            }
            error!("HTTP server stopped");
        }
    }

    info!("API server stopped");
    Ok(())
}
