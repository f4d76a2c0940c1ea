mod cli;

use crate::cli::app::App;
use dignitary_tracker::config::AppConfig;
use std::error::Error;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing()?;

    let config = AppConfig::from_env()?;
    let store = config.build_store().await?;

    let mut app = App::new(store);
    app.run().await?;
    Ok(())
}

/// The terminal owns stdout, so logs only go to `TRACKER_LOG_FILE` when set.
fn init_tracing() -> Result<(), Box<dyn Error>> {
    let Ok(path) = std::env::var("TRACKER_LOG_FILE") else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dignitary_tracker=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}
