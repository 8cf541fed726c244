//! Discord bot client setup and lifecycle management.

use super::KeystockHandler;
use crate::{CommandDispatcher, GatewayError, GatewayErrorKind};
use serenity::Client;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{info, instrument};

/// Discord client running the keystock command handler.
///
/// # Example
/// ```no_run
/// use keystock_bot::{CommandDispatcher, KeystockBot, RoleIds};
/// use keystock_inventory::KeyStore;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let token = std::env::var("DISCORD_TOKEN")?;
///     let store = KeyStore::open("stock.json").await;
///     let roles = RoleIds { issuer: 1, consumer: 2 };
///     let dispatcher = Arc::new(CommandDispatcher::new(store, roles, "!"));
///
///     let shutdown = dispatcher.shutdown_signal();
///     let bot = KeystockBot::new(&token, dispatcher, 3).await?;
///     bot.run(shutdown).await?;
///     Ok(())
/// }
/// ```
pub struct KeystockBot {
    client: Client,
}

impl KeystockBot {
    /// Build the Serenity client.
    ///
    /// # Errors
    /// Returns an error if the token is rejected or the client fails to
    /// initialize.
    #[instrument(skip(token, dispatcher), fields(token_len = token.len()))]
    pub async fn new(
        token: &str,
        dispatcher: Arc<CommandDispatcher>,
        admin_channel_id: u64,
    ) -> Result<Self, GatewayError> {
        info!("Initializing keystock Discord bot");

        let handler = KeystockHandler::new(dispatcher, admin_channel_id);
        let intents = KeystockHandler::intents();

        info!("Building Serenity client with intents: {:?}", intents);

        let client = Client::builder(token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                GatewayError::new(GatewayErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        Ok(Self { client })
    }

    /// Run the bot until `shutdown` is notified or the connection ends.
    ///
    /// # Errors
    /// Returns an error if the client fails to start or hits a fatal error.
    #[instrument(skip_all)]
    pub async fn run(mut self, shutdown: Arc<Notify>) -> Result<(), GatewayError> {
        let shard_manager = self.client.shard_manager.clone();
        tokio::spawn(async move {
            shutdown.notified().await;
            info!("Stopping Discord shards");
            shard_manager.shutdown_all().await;
        });

        info!("Starting Discord bot");
        self.client.start().await.map_err(|e| {
            GatewayError::new(GatewayErrorKind::ConnectionFailed(format!(
                "Client error: {}",
                e
            )))
        })?;

        info!("Discord bot stopped");
        Ok(())
    }
}
