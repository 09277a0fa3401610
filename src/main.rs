use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use starboard::{Config, api::create_router, app::build_state};

/// Initialize tracing. `RUST_LOG` wins over `STARBOARD_LOG`; `LOG_FORMAT=json` selects JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("STARBOARD_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting starboard");

    let config = Config::from_env()?;
    config.validate()?;
    info!("Configuration loaded and validated");

    let state = build_state(&config)?;
    info!(plugins = state.catalog.len(), "Application state initialized");

    let app = create_router(state);

    info!("Listening on {}", config.listen_addr);
    let listener = TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
