//! Discord integration using the Serenity library.
//!
//! - **client**: Serenity client setup and lifecycle management
//! - **handler**: event handler turning messages into dispatched commands
//! - **gateway**: [`ChatGateway`](crate::ChatGateway) implementation for one message

mod client;
mod gateway;
mod handler;

pub use client::KeystockBot;
pub use gateway::DiscordGateway;
pub use handler::KeystockHandler;
