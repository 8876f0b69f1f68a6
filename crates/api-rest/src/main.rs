//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the RxPad HTTP surface (entry page, JSON API, Swagger UI) on its own.
//!
//! ## Intended use
//! Useful for development when working on the API crate alone. The workspace's main `rxpad-run`
//! binary serves the same router.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use rxpad_core::constants::DEFAULT_REST_ADDR;
use rxpad_core::{core_config_from_env_values, EnvValues};

/// Main entry point for the RxPad REST API server
///
/// # Environment Variables
/// - `RXPAD_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `RXPAD_DATA_DIR`, `RXPAD_OUTPUT_DIR`, `RXPAD_PRINT_DELAY_MS`, `RXPAD_DATE_STYLE`,
///   `RXPAD_PRINT_COMMAND`: core configuration
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the core configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("rxpad_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("RXPAD_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    let cfg = core_config_from_env_values(EnvValues::from_process_env())?;

    tracing::info!("-- Starting RxPad REST API on {}", addr);
    tracing::info!("-- Settings stored under {}", cfg.data_dir().display());

    let app = router(AppState::new(cfg));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
