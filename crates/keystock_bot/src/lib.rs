//! Discord bot that issues tiered license keys.
//!
//! Admins upload keys into four tiers; clients draw them by private message,
//! check stock, and forward HWID bind requests to an admin channel.
//!
//! # Architecture
//!
//! - `Command` - parsing of `!`-prefixed chat messages
//! - `CommandDispatcher` - role check, one inventory operation, one reply
//! - `ChatGateway` - trait the dispatcher replies through
//! - `discord` - Serenity client, event handler, and gateway implementation
//! - `liveness` - `GET /` endpoint for uptime monitors
//! - `BotConfig` - layered configuration (defaults, TOML file, environment)

#![warn(missing_docs)]

mod auth;
mod command;
mod config;
mod discord;
mod dispatcher;
mod gateway;
pub mod liveness;
mod replies;

pub use auth::{Invocation, Role, RoleIds};
pub use command::{Command, CommandError, CommandErrorKind};
pub use config::BotConfig;
pub use discord::{DiscordGateway, KeystockBot, KeystockHandler};
pub use dispatcher::{CommandDispatcher, DEFAULT_DELIVERY_TIMEOUT};
pub use gateway::{ChatGateway, GatewayError, GatewayErrorKind, GatewayResult};
pub use replies::{command_error, unexpected_error};
