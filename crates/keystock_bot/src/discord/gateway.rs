//! Discord delivery for a single inbound message.

use crate::{ChatGateway, GatewayError, GatewayErrorKind, GatewayResult};
use async_trait::async_trait;
use serenity::builder::CreateMessage;
use serenity::client::Context;
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;
use tracing::debug;

const FORBIDDEN: u16 = 403;
const NOT_FOUND: u16 = 404;

/// HTTP status of a failed Discord API request, if the error carries one.
fn status_code(err: &serenity::Error) -> Option<u16> {
    match err {
        serenity::Error::Http(http) => http.status_code().map(|status| status.as_u16()),
        _ => None,
    }
}

/// Sends replies for one message through the Discord HTTP API.
pub struct DiscordGateway<'a> {
    ctx: &'a Context,
    msg: &'a Message,
    admin_channel: ChannelId,
}

impl<'a> DiscordGateway<'a> {
    /// Bind a gateway to the message being handled.
    pub fn new(ctx: &'a Context, msg: &'a Message, admin_channel: ChannelId) -> Self {
        Self {
            ctx,
            msg,
            admin_channel,
        }
    }
}

#[async_trait]
impl ChatGateway for DiscordGateway<'_> {
    async fn reply(&self, text: &str) -> GatewayResult<()> {
        self.msg
            .channel_id
            .say(&self.ctx.http, text)
            .await
            .map(|_| ())
            .map_err(|e| GatewayError::new(GatewayErrorKind::SendFailed(e.to_string())))
    }

    async fn direct_message(&self, text: &str) -> GatewayResult<()> {
        let builder = CreateMessage::new().content(text);
        match self.msg.author.direct_message(self.ctx, builder).await {
            Ok(_) => Ok(()),
            Err(e) if status_code(&e) == Some(FORBIDDEN) => {
                debug!(user_id = %self.msg.author.id, "Direct message refused");
                Err(GatewayError::new(GatewayErrorKind::DirectMessageRefused(
                    format!("user {}: {}", self.msg.author.id, e),
                )))
            }
            Err(e) => Err(GatewayError::new(GatewayErrorKind::SendFailed(e.to_string()))),
        }
    }

    async fn notify_admins(&self, text: &str) -> GatewayResult<()> {
        match self.admin_channel.say(&self.ctx.http, text).await {
            Ok(_) => Ok(()),
            Err(e) if matches!(status_code(&e), Some(FORBIDDEN | NOT_FOUND)) => {
                Err(GatewayError::new(GatewayErrorKind::ChannelUnavailable(
                    format!("channel {}: {}", self.admin_channel, e),
                )))
            }
            Err(e) => Err(GatewayError::new(GatewayErrorKind::SendFailed(e.to_string()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_http_errors_have_no_status() {
        let err = serenity::Error::Other("boom");
        assert_eq!(status_code(&err), None);
    }
}
