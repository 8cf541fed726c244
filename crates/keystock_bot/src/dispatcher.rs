//! Command dispatch: authorization, one inventory operation, one reply.

use crate::{
    ChatGateway, Command, GatewayError, GatewayErrorKind, GatewayResult, Invocation, RoleIds,
    replies,
};
use keystock_error::InventoryErrorKind;
use keystock_inventory::{KeyStore, Tier};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, info, instrument, warn};

/// Runs parsed commands against the key store.
///
/// Validation and authorization failures are answered in the invoking
/// channel and reported as success; only failures to reach the chat
/// platform itself are returned as errors.
#[derive(Debug)]
pub struct CommandDispatcher {
    store: KeyStore,
    roles: RoleIds,
    prefix: String,
    shutdown: Arc<Notify>,
    delivery_timeout: Duration,
}

/// How long `gen` waits for its private message before returning the keys.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

impl CommandDispatcher {
    /// Create a dispatcher over `store`.
    pub fn new(store: KeyStore, roles: RoleIds, prefix: impl Into<String>) -> Self {
        Self {
            store,
            roles,
            prefix: prefix.into(),
            shutdown: Arc::new(Notify::new()),
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }

    /// Bound the private message sent by `gen`.
    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    /// The key store commands operate on.
    pub fn store(&self) -> &KeyStore {
        &self.store
    }

    /// Command prefix used in help text and usage hints.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Signal notified once when a `shutdown` command is accepted.
    pub fn shutdown_signal(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// Authorize and execute one command.
    #[instrument(skip_all, fields(command = command.name(), author = %invocation.author()))]
    pub async fn dispatch(
        &self,
        invocation: &Invocation,
        command: Command,
        gateway: &dyn ChatGateway,
    ) -> GatewayResult<()> {
        if let Some(role) = command.required_role()
            && !invocation.has_role(role, &self.roles)
        {
            debug!(%role, "Author lacks required role");
            return gateway.reply(&replies::permission_denied(&command)).await;
        }

        match command {
            Command::Upload { tier, keys } => self.upload(&tier, keys, gateway).await,
            Command::Gen { tier, amount } => self.generate(&tier, amount, gateway).await,
            Command::ViewStock => self.view_stock(gateway).await,
            Command::Hwid { keys } => self.hwid(invocation, keys, gateway).await,
            Command::Shutdown => self.shutdown(gateway).await,
            Command::Help => self.help(gateway).await,
        }
    }

    async fn upload(
        &self,
        tier: &str,
        keys: Vec<String>,
        gateway: &dyn ChatGateway,
    ) -> GatewayResult<()> {
        let Ok(tier) = Tier::parse(tier) else {
            return gateway.reply(&replies::invalid_tier()).await;
        };

        let (count, durability) = self.store.add(tier, keys).await.into_parts();
        gateway
            .reply(&replies::uploaded(count, tier, &durability))
            .await
    }

    /// Keys stay reserved, with the store locked, until the private message
    /// either lands, is refused, or exceeds the delivery timeout. Every other
    /// command waits on the store for at most that long.
    async fn generate(
        &self,
        tier: &str,
        amount: usize,
        gateway: &dyn ChatGateway,
    ) -> GatewayResult<()> {
        let Ok(tier) = Tier::parse(tier) else {
            return gateway.reply(&replies::invalid_tier()).await;
        };

        let reservation = match self.store.reserve(tier, amount).await {
            Ok(reservation) => reservation,
            Err(err) => {
                if let InventoryErrorKind::InsufficientStock { available, .. } = err.kind() {
                    debug!(%tier, amount, available, "Insufficient stock");
                }
                return gateway.reply(&replies::not_enough_stock(tier)).await;
            }
        };

        let message = replies::issued_keys(tier, reservation.keys());
        let sent = gateway.direct_message(&message);
        let delivery = tokio::time::timeout(self.delivery_timeout, sent)
            .await
            .unwrap_or_else(|_| {
                Err(GatewayError::new(GatewayErrorKind::SendFailed(format!(
                    "direct message timed out after {:?}",
                    self.delivery_timeout
                ))))
            });

        match delivery {
            Ok(()) => {
                let durability = reservation.durability().clone();
                let issued = reservation.release();
                info!(%tier, issued = issued.len(), "Issued keys");
                gateway
                    .reply(&replies::keys_sent(issued.len(), tier, &durability))
                    .await
            }
            Err(err) => {
                warn!(%tier, error = %err, "Key delivery failed, returning keys to stock");
                let durability = reservation.restore().await;
                if err.is_direct_message_refused() {
                    gateway.reply(&replies::dm_refused_with(&durability)).await
                } else {
                    if !durability.is_persisted() {
                        gateway.reply(&replies::not_persisted()).await?;
                    }
                    Err(err)
                }
            }
        }
    }

    async fn view_stock(&self, gateway: &dyn ChatGateway) -> GatewayResult<()> {
        let counts = self.store.counts().await;
        self.deliver_privately(
            gateway,
            &replies::stock_overview(&counts),
            &replies::stock_sent(),
        )
        .await
    }

    async fn hwid(
        &self,
        invocation: &Invocation,
        keys: Vec<String>,
        gateway: &dyn ChatGateway,
    ) -> GatewayResult<()> {
        let (_, unknown) = self.store.partition_known(&keys).await;
        if !unknown.is_empty() {
            debug!(unknown = unknown.len(), "Rejecting HWID request with unknown keys");
            return gateway.reply(&replies::invalid_keys(&unknown)).await;
        }

        for key in &keys {
            match gateway
                .notify_admins(&replies::hwid_request(key, invocation.author()))
                .await
            {
                Ok(()) => {}
                Err(err) if err.is_channel_unavailable() => {
                    warn!(error = %err, "Admin channel unavailable");
                    return gateway.reply(&replies::admin_channel_missing()).await;
                }
                Err(err) => return Err(err),
            }
        }

        info!(keys = keys.len(), "Forwarded HWID bind requests");
        gateway.reply(&replies::hwid_forwarded(&keys)).await
    }

    async fn shutdown(&self, gateway: &dyn ChatGateway) -> GatewayResult<()> {
        info!("Shutdown requested");
        let reply = gateway.reply(&replies::shutting_down()).await;
        self.shutdown.notify_one();
        reply
    }

    async fn help(&self, gateway: &dyn ChatGateway) -> GatewayResult<()> {
        self.deliver_privately(
            gateway,
            &replies::help(&self.prefix),
            &replies::help_sent(),
        )
        .await
    }

    /// DM `message`, then confirm in channel; a refused DM is reported in
    /// channel instead.
    async fn deliver_privately(
        &self,
        gateway: &dyn ChatGateway,
        message: &str,
        confirmation: &str,
    ) -> GatewayResult<()> {
        match gateway.direct_message(message).await {
            Ok(()) => gateway.reply(confirmation).await,
            Err(err) if err.is_direct_message_refused() => {
                gateway.reply(&replies::dm_refused()).await
            }
            Err(err) => Err(err),
        }
    }
}
