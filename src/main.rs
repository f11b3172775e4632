//! # Catalog Server - Entry Point
//! src/main.rs
//!
//! Lee la configuración, carga los seeds y arranca el servidor.

use anyhow::{anyhow, Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_server::catalog::{SeedData, Store};
use catalog_server::config::Config;
use catalog_server::server::Server;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::new();
    config
        .validate()
        .map_err(|e| anyhow!(e))
        .context("Invalid configuration")?;
    config.log_summary();

    let seeds = match &config.seeds_dir {
        Some(dir) => SeedData::from_dir(dir)
            .with_context(|| format!("Failed to load seed data from {}", dir.display()))?,
        None => SeedData::embedded().context("Failed to load embedded seed data")?,
    };
    let store = Store::from_seeds(seeds).context("Failed to build catalog from seed data")?;
    info!(
        artists = store.artists().len(),
        albums = store.albums().len(),
        songs = store.songs().len(),
        "catalog ready"
    );

    let mut server = Server::new(config, store);
    server.run().context("Server error")?;

    Ok(())
}
