// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use farmer_shield_ai::{
    api::{start_server, AppState},
    config::ServiceConfig,
    diagnosis::{ClassCatalog, SeverityTable},
    version,
    vision::{ClassifierModelManager, ImageFetcher},
};
use std::env;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🌾 Starting {}...", version::SERVICE_NAME);
    println!("   {}", version::SERVICE_DESCRIPTION);
    println!("📦 {}", version::get_version_string());
    println!();

    let config = ServiceConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    println!("🧠 Loading classifier model...");
    let manager = ClassifierModelManager::new(config.model_config());
    if manager.has_classifier() {
        println!("✅ Classifier ready: {}", manager.model_info().name);
    } else {
        println!("⚠️  Classifier unavailable, /api/predict will answer 503");
    }

    let fetcher = ImageFetcher::new(config.fetch_timeout())?;
    let state = AppState::from_components(
        &manager,
        ClassCatalog::plant_village(),
        SeverityTable::default(),
        fetcher,
    );

    let addr = config.listen_addr();
    println!("\nAPI Endpoints:");
    println!("  Health:       http://{}/health", addr);
    println!("  Predict:      POST http://{}/api/predict", addr);
    println!("\nPress Ctrl+C to shutdown...\n");

    start_server(addr, state, async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
        println!("\n⏹️  Shutting down...");
    })
    .await?;

    println!("👋 Goodbye!");
    Ok(())
}
