//! Chat platform seam used by the command dispatcher.
//!
//! The dispatcher only talks to the platform through [`ChatGateway`], so the
//! command logic runs the same against Discord and against test doubles.

use async_trait::async_trait;
use derive_getters::Getters;

/// Gateway error variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum GatewayErrorKind {
    /// The recipient does not accept private messages from the bot.
    #[display("Direct message refused: {_0}")]
    DirectMessageRefused(String),

    /// The notification channel does not exist or is not visible to the bot.
    #[display("Channel unavailable: {_0}")]
    ChannelUnavailable(String),

    /// Any other failure to deliver a message.
    #[display("Message send failed: {_0}")]
    SendFailed(String),

    /// Connection to the platform failed.
    #[display("Connection failed: {_0}")]
    ConnectionFailed(String),
}

/// Gateway error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Gateway Error: {} at line {} in {}", kind, line, file)]
pub struct GatewayError {
    kind: GatewayErrorKind,
    line: u32,
    file: &'static str,
}

impl GatewayError {
    /// Create a new GatewayError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use keystock_bot::{GatewayError, GatewayErrorKind};
    ///
    /// let err = GatewayError::new(GatewayErrorKind::DirectMessageRefused("user 42".to_string()));
    /// assert!(err.is_direct_message_refused());
    /// ```
    #[track_caller]
    pub fn new(kind: GatewayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the recipient refused a private message.
    pub fn is_direct_message_refused(&self) -> bool {
        matches!(self.kind, GatewayErrorKind::DirectMessageRefused(_))
    }

    /// Whether the notification channel could not be reached.
    pub fn is_channel_unavailable(&self) -> bool {
        matches!(self.kind, GatewayErrorKind::ChannelUnavailable(_))
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Outbound messaging for one inbound command.
///
/// An implementation is bound to the message being handled: `reply` answers
/// in the channel the command came from and `direct_message` goes to its
/// author.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send a message to the invoking channel.
    async fn reply(&self, text: &str) -> GatewayResult<()>;

    /// Send a private message to the invoking user.
    ///
    /// Fails with [`GatewayErrorKind::DirectMessageRefused`] when the user
    /// does not accept private messages.
    async fn direct_message(&self, text: &str) -> GatewayResult<()>;

    /// Send a message to the admin notification channel.
    ///
    /// Fails with [`GatewayErrorKind::ChannelUnavailable`] when the channel
    /// cannot be reached.
    async fn notify_admins(&self, text: &str) -> GatewayResult<()>;
}
