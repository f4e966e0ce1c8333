mod app;
mod config;
mod db;
mod domain;
mod infrastructure;
mod report;
mod schedule;
mod watcher;

use anyhow::Result;
use infrastructure::{directories, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config.logging, &paths)?;

    let app = app::WatcherApp::initialize(config, &paths).await?;
    app.run().await
}
