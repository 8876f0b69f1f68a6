use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use rxpad_core::constants::DEFAULT_REST_ADDR;
use rxpad_core::{EnvValues, core_config_from_env_values};

/// Main entry point for the RxPad application
///
/// Serves the browser entry page, the JSON API and the Swagger UI on one address, and shuts
/// down cleanly on Ctrl-C.
///
/// # Environment Variables
/// - `RXPAD_REST_ADDR`: HTTP server address (default: "0.0.0.0:3000")
/// - `RXPAD_DATA_DIR`: Directory holding the settings slot (default: "rxpad_data")
/// - `RXPAD_OUTPUT_DIR`: Directory for printed documents (default: "<data dir>/prints")
/// - `RXPAD_PRINT_DELAY_MS`: Delay before the print action runs (default: 250)
/// - `RXPAD_DATE_STYLE`: Date rendering in the patient band, `mdy`, `dmy` or `iso`
/// - `RXPAD_PRINT_COMMAND`: Program (plus arguments) that prints a written document
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, binding or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rxpad_run=info".parse()?)
                .add_directive("rxpad_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("RXPAD_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    let cfg = core_config_from_env_values(EnvValues::from_process_env())?;

    tracing::info!("++ Starting RxPad on {}", rest_addr);
    tracing::info!(
        "++ Settings in {}, prints in {}",
        cfg.data_dir().display(),
        cfg.output_dir().display()
    );

    let app = router(AppState::new(cfg));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("-- Shutting down RxPad");
        })
        .await?;

    Ok(())
}
