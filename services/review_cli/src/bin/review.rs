//! services/review_cli/src/bin/review.rs

use app_review_core::{controller::SessionController, session::SessionState};
use review_cli_lib::{adapters::HttpReviewGateway, config::Config, console, error::CliError};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    // Logs go to stderr so they never interleave with the page on stdout.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| CliError::Internal(format!("Failed to initialise logging: {}", e)))?;
    info!("Configuration loaded. Backend at {}", config.api_base_url);

    // --- 2. Initialize the Gateway Adapter ---
    let gateway = Arc::new(HttpReviewGateway::new(
        &config.api_base_url,
        config.request_timeout,
    )?);

    // --- 3. Build the Session ---
    let controller = Arc::new(SessionController::new(
        gateway,
        SessionState::new(config.default_platform, config.view_mode),
    ));

    // --- 4. Run the Console ---
    console::run(
        controller,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}
