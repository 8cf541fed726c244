//! Serenity event handler for the keystock bot.

use super::DiscordGateway;
use crate::{ChatGateway, Command, CommandDispatcher, Invocation, replies};
use serenity::all::{ActivityData, Ready};
use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::channel::Message;
use serenity::model::gateway::GatewayIntents;
use serenity::model::id::ChannelId;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Event handler for the keystock Discord bot.
///
/// Parses prefixed messages and hands them to the shared
/// [`CommandDispatcher`].
pub struct KeystockHandler {
    dispatcher: Arc<CommandDispatcher>,
    admin_channel: ChannelId,
}

impl KeystockHandler {
    /// Create a handler dispatching to `dispatcher`, forwarding HWID requests
    /// to `admin_channel_id`.
    pub fn new(dispatcher: Arc<CommandDispatcher>, admin_channel_id: u64) -> Self {
        Self {
            dispatcher,
            admin_channel: ChannelId::new(admin_channel_id),
        }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    /// Build the invocation for a message. Direct messages carry no member
    /// data and therefore no roles.
    fn invocation(msg: &Message) -> Invocation {
        let role_ids = msg
            .member
            .as_ref()
            .map(|member| member.roles.iter().map(|role| role.get()).collect())
            .unwrap_or_default();
        Invocation::new(msg.author.name.clone(), role_ids)
    }
}

#[async_trait]
impl EventHandler for KeystockHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "Bot is ready");
        let activity = format!("{}help for commands", self.dispatcher.prefix());
        ctx.set_activity(Some(ActivityData::playing(activity)));
    }

    #[instrument(skip_all, fields(channel_id = %msg.channel_id, author = %msg.author.name))]
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let prefix = self.dispatcher.prefix();
        let Some(parsed) = Command::parse(prefix, &msg.content) else {
            return;
        };

        let gateway = DiscordGateway::new(&ctx, &msg, self.admin_channel);
        let result = match parsed {
            Ok(command) => {
                debug!(command = command.name(), "Dispatching command");
                self.dispatcher
                    .dispatch(&Self::invocation(&msg), command, &gateway)
                    .await
            }
            Err(err) => {
                debug!(error = %err, "Rejected command");
                gateway.reply(&replies::command_error(prefix, &err)).await
            }
        };

        if let Err(e) = result {
            error!(error = ?e, "Command failed");
            if let Err(e) = msg
                .channel_id
                .say(&ctx.http, replies::unexpected_error(&e))
                .await
            {
                error!(error = %e, "Failed to report command failure");
            }
        }
    }
}
