//! keystock - Discord license key bot.
//!
//! Loads configuration, opens the stock file, starts the liveness endpoint,
//! and runs the Discord client until a `shutdown` command or CTRL+C.

use clap::Parser;
use keystock_bot::{BotConfig, CommandDispatcher, KeystockBot, liveness};
use keystock_inventory::KeyStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the bot.
#[derive(Parser, Debug)]
#[command(name = "keystock")]
#[command(about = "Discord bot issuing tiered license keys")]
#[command(version)]
struct Args {
    /// Path to a TOML configuration file (defaults to ./keystock.toml if present)
    #[arg(short, long, env = "KEYSTOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging when RUST_LOG is not set
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the environment may be set directly
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Starting keystock");

    let config = BotConfig::load(args.config.as_deref())?;
    info!(
        stock_path = %config.stock_path().display(),
        port = config.port(),
        "Configuration loaded"
    );

    let store = KeyStore::open_with_legacy(config.stock_path(), config.legacy_import_path()).await;
    let dispatcher = Arc::new(
        CommandDispatcher::new(store, config.role_ids(), config.command_prefix().clone())
            .with_delivery_timeout(config.delivery_timeout()),
    );

    match liveness::bind(*config.port()).await {
        Ok(listener) => {
            tokio::spawn(async move {
                if let Err(e) = liveness::serve(listener).await {
                    error!(error = %e, "Liveness endpoint stopped");
                }
            });
        }
        Err(e) => warn!(port = config.port(), error = %e, "Failed to bind liveness endpoint"),
    }

    let shutdown = dispatcher.shutdown_signal();
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            ctrl_c.notify_one();
        }
    });

    let bot = KeystockBot::new(
        config.discord_token(),
        dispatcher,
        *config.admin_channel_id(),
    )
    .await?;
    bot.run(shutdown).await?;

    info!("keystock stopped");
    Ok(())
}
