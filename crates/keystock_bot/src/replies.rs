//! User-facing message text.

use crate::{Command, CommandError, CommandErrorKind, GatewayError};
use keystock_inventory::{Durability, Tier};

const DM_REFUSED: &str = "⚠️ I couldn't DM you! Please enable DMs and try again.";
const NOT_PERSISTED: &str =
    "⚠️ The stock file could not be saved. This change will be lost if the bot restarts.";

/// Append the persistence warning when a mutation stayed in memory.
fn with_durability(message: String, durability: &Durability) -> String {
    if durability.is_persisted() {
        message
    } else {
        format!("{message}\n{NOT_PERSISTED}")
    }
}

pub(crate) fn permission_denied(command: &Command) -> String {
    let action = match command {
        Command::Upload { .. } => "upload keys",
        Command::Gen { .. } => "generate keys",
        Command::ViewStock => "view stock",
        Command::Hwid { .. } => "request HWID binding",
        Command::Shutdown => "shut down the bot",
        Command::Help => "view help",
    };
    format!("❌ You do not have permission to {action}.")
}

pub(crate) fn invalid_tier() -> String {
    let valid: Vec<String> = Tier::all().map(|tier| format!("`{tier}`")).collect();
    format!("❌ Invalid key type. Valid types: {}.", valid.join(", "))
}

pub(crate) fn uploaded(count: usize, tier: Tier, durability: &Durability) -> String {
    with_durability(
        format!("✅ Successfully uploaded `{count}` keys to `{tier}` stock."),
        durability,
    )
}

pub(crate) fn not_enough_stock(tier: Tier) -> String {
    format!("❌ Not enough `{tier}` keys available in stock.")
}

pub(crate) fn issued_keys(tier: Tier, keys: &[String]) -> String {
    format!("🔑 Your `{tier}` keys: {}", keys.join(", "))
}

pub(crate) fn keys_sent(amount: usize, tier: Tier, durability: &Durability) -> String {
    with_durability(
        format!("✅ `{amount}` `{tier}` key(s) have been sent to your DMs."),
        durability,
    )
}

pub(crate) fn dm_refused() -> String {
    DM_REFUSED.to_string()
}

/// Refused DM after reserved keys were put back.
pub(crate) fn dm_refused_with(durability: &Durability) -> String {
    with_durability(dm_refused(), durability)
}

pub(crate) fn not_persisted() -> String {
    NOT_PERSISTED.to_string()
}

pub(crate) fn stock_overview(counts: &[(Tier, usize)]) -> String {
    let mut message = String::from("**📦 Current Stock:**\n");
    for (tier, count) in counts {
        message.push_str(&format!("**{}**: `{count}` keys\n", tier.title()));
    }
    message
}

pub(crate) fn stock_sent() -> String {
    "✅ Stock overview has been sent to your DMs.".to_string()
}

pub(crate) fn invalid_keys(keys: &[String]) -> String {
    format!(
        "❌ Invalid keys: {}. Please check the keys and try again.",
        keys.join(", ")
    )
}

pub(crate) fn hwid_request(key: &str, author: &str) -> String {
    format!("⚙️ HWID bind request for key `{key}` from `{author}`")
}

pub(crate) fn hwid_forwarded(keys: &[String]) -> String {
    format!(
        "✅ Your HWID bind request for keys `{}` has been sent to the admin.",
        keys.join(", ")
    )
}

pub(crate) fn admin_channel_missing() -> String {
    "⚠️ Could not find the admin channel.".to_string()
}

pub(crate) fn shutting_down() -> String {
    "🔴 Bot is shutting down...".to_string()
}

pub(crate) fn help(prefix: &str) -> String {
    format!(
        "**🤖 Available Commands:**\n\
         🔹 `{prefix}upload <day|week|month|lifetime> <key1> <key2> ...` *(Admin Only)*\n \
         ➥ Uploads keys to the stock.\n\
         🔹 `{prefix}gen <day|week|month|lifetime> <amount>` *(Client Only)*\n \
         ➥ Generates and sends multiple keys from stock via DM.\n\
         🔹 `{prefix}view_stock` *(Client Only)*\n \
         ➥ Views available key stock. Sent via DM.\n\
         🔹 `{prefix}hwid <key1, key2, ...>` *(Client Only)*\n \
         ➥ Requests HWID binding for specific keys.\n\
         🔹 `{prefix}shutdown` *(Admin Only)*\n \
         ➥ Shuts down the bot.\n"
    )
}

pub(crate) fn help_sent() -> String {
    "✅ Help message sent to your DMs.".to_string()
}

/// Reply for a message that could not be parsed as a command.
pub fn command_error(prefix: &str, err: &CommandError) -> String {
    match &err.kind {
        CommandErrorKind::UnknownCommand(_) => {
            format!("❌ Invalid command. Use `{prefix}help` to see available commands.")
        }
        CommandErrorKind::MissingArgument { .. } => {
            format!("❌ Missing required argument. Please check `{prefix}help` for proper usage.")
        }
        CommandErrorKind::InvalidArgument {
            argument, value, ..
        } => format!(
            "❌ Invalid value `{value}` for `{argument}`. Please check `{prefix}help` for proper usage."
        ),
    }
}

/// Reply echoed when a command fails unexpectedly.
pub fn unexpected_error(err: &GatewayError) -> String {
    format!("An error occurred: {}", err.kind())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystock_error::{StorageError, StorageErrorKind};

    #[test]
    fn invalid_tier_lists_every_tier() {
        assert_eq!(
            invalid_tier(),
            "❌ Invalid key type. Valid types: `day`, `week`, `month`, `lifetime`."
        );
    }

    #[test]
    fn memory_only_mutations_carry_a_warning() {
        let failed = Durability::MemoryOnly(StorageError::new(StorageErrorKind::FileWrite(
            "stock.json".to_string(),
        )));
        assert!(uploaded(2, Tier::Day, &failed).contains("could not be saved"));
        assert!(!uploaded(2, Tier::Day, &Durability::Persisted).contains("could not be saved"));
    }

    #[test]
    fn stock_overview_uses_title_case() {
        let overview = stock_overview(&[(Tier::Day, 3), (Tier::Lifetime, 0)]);
        assert!(overview.contains("**Day**: `3` keys"));
        assert!(overview.contains("**Lifetime**: `0` keys"));
    }

    #[test]
    fn help_uses_the_configured_prefix() {
        let text = help("$");
        assert!(text.contains("`$gen <day|week|month|lifetime> <amount>`"));
        assert!(!text.contains("`!"));
    }
}
