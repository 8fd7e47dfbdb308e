//! Press content service: binary entrypoint.
//! Composition root: loads config and the bundled seed, then serves the Axum router.

use press_content::content::SeedData;
use press_content::ContentConfig;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Structured logs; `LOG_FORMAT=json` switches to JSON lines.
/// `try_init` because the runtime may already have installed a subscriber.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("press_content=info,content=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = ContentConfig::load_default()?;
    let seed = SeedData::bundled()?;
    let router = press_content::app(&cfg, seed)?;

    Ok(router.into())
}
