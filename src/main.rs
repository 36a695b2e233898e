//! HostPulse - Host Reachability Monitor
//!
//! Continuously pings a configured set of hosts, tracking status flips,
//! latency and per-host history.

mod config;
mod controller;
mod monitor;
mod probe;
mod store;

use config::AppConfig;
use controller::MonitorSet;
use monitor::HostStatus;
use probe::SystemPinger;
use store::FavoritesStore;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("hostpulse=info".parse()?))
        .init();

    // Load configuration
    let cfg = AppConfig::load();
    tracing::info!("Starting HostPulse...");
    tracing::info!("Using favorites store at {}", cfg.favorites_path.display());

    let store = FavoritesStore::open(&cfg.favorites_path);
    tracing::info!("Loaded {} saved list(s)", store.lists().len());

    let (mut monitors, mut events) = MonitorSet::new(Arc::new(SystemPinger), &cfg);

    // Resume the first saved list, otherwise seed a default pair
    if let Some(list) = store.lists().first() {
        monitors.load_list(list);
    } else {
        tracing::info!("No saved lists, adding sample hosts");
        monitors.add("8.8.8.8", "Google DNS");
        monitors.add("1.1.1.1", "Cloudflare DNS");
    }

    // Transition notifier: every status flip becomes a log line
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let ts = event.timestamp.format("%d/%m/%Y %H:%M:%S");
            match event.new_status {
                HostStatus::Up => {
                    tracing::info!("{} reachable: [{}] {} is responding again", event.label, ts, event.hostname);
                }
                _ => {
                    tracing::warn!("{} unreachable: [{}] {} stopped responding", event.label, ts, event.hostname);
                }
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down, stopping all monitors");
    monitors.stop_all();

    Ok(())
}
