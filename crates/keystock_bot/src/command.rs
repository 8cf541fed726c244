//! Chat command parsing.
//!
//! # Supported Commands
//!
//! - `upload <tier> <key>...` - add keys to a tier (issuer)
//! - `gen <tier> <amount>` - draw keys by private message (consumer)
//! - `view_stock` - stock counts by private message (consumer)
//! - `hwid <key1, key2, ...>` - forward HWID bind requests to admins (consumer)
//! - `shutdown` - stop the bot (issuer)
//! - `help` - command overview by private message (anyone)

use crate::Role;
use derive_more::{Display, Error};

/// Specific command parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum CommandErrorKind {
    /// No command with this name.
    #[display("Unknown command: {}", _0)]
    UnknownCommand(String),

    /// A required argument is absent.
    #[display("Missing required argument '{}' for command '{}'", argument, command)]
    MissingArgument {
        /// Command being parsed.
        command: &'static str,
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// An argument could not be interpreted.
    #[display("Invalid argument '{}' for command '{}': {}", argument, command, value)]
    InvalidArgument {
        /// Command being parsed.
        command: &'static str,
        /// Name of the argument.
        argument: &'static str,
        /// Value as given by the user.
        value: String,
    },
}

/// Command parsing error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Command Error: {} at line {} in {}", kind, line, file)]
pub struct CommandError {
    /// The kind of error that occurred
    pub kind: CommandErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CommandError {
    /// Create a new command error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CommandErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// A parsed chat command.
///
/// Tier names are kept as typed; they are validated after the role check so
/// unauthorized users learn nothing about the stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add keys to a tier.
    Upload {
        /// Tier name as typed.
        tier: String,
        /// Keys in upload order.
        keys: Vec<String>,
    },
    /// Draw keys from a tier.
    Gen {
        /// Tier name as typed.
        tier: String,
        /// Number of keys, at least one.
        amount: usize,
    },
    /// Show stock counts.
    ViewStock,
    /// Request HWID binding for existing keys.
    Hwid {
        /// Keys to bind.
        keys: Vec<String>,
    },
    /// Stop the bot.
    Shutdown,
    /// Show the command overview.
    Help,
}

impl Command {
    /// Parse a chat message.
    ///
    /// Returns `None` when the message does not start with `prefix`.
    ///
    /// # Examples
    ///
    /// ```
    /// use keystock_bot::Command;
    ///
    /// let command = Command::parse("!", "!gen day 2").unwrap().unwrap();
    /// assert_eq!(command, Command::Gen { tier: "day".to_string(), amount: 2 });
    /// assert!(Command::parse("!", "hello").is_none());
    /// ```
    pub fn parse(prefix: &str, content: &str) -> Option<Result<Self, CommandError>> {
        let body = content.strip_prefix(prefix)?.trim();
        let (name, args) = match body.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (body, ""),
        };

        Some(match name {
            "upload" => Self::parse_upload(args),
            "gen" => Self::parse_gen(args),
            "view_stock" => Ok(Command::ViewStock),
            "hwid" => Self::parse_hwid(args),
            "shutdown" => Ok(Command::Shutdown),
            "help" => Ok(Command::Help),
            other => Err(CommandError::new(CommandErrorKind::UnknownCommand(
                other.to_string(),
            ))),
        })
    }

    fn parse_upload(args: &str) -> Result<Self, CommandError> {
        let mut words = args.split_whitespace();
        let tier = words.next().ok_or_else(|| missing("upload", "tier"))?;
        let keys: Vec<String> = words.map(str::to_string).collect();
        if keys.is_empty() {
            return Err(missing("upload", "keys"));
        }
        Ok(Command::Upload {
            tier: tier.to_string(),
            keys,
        })
    }

    fn parse_gen(args: &str) -> Result<Self, CommandError> {
        let mut words = args.split_whitespace();
        let tier = words.next().ok_or_else(|| missing("gen", "tier"))?;
        let raw_amount = words.next().ok_or_else(|| missing("gen", "amount"))?;
        let amount = raw_amount
            .parse::<usize>()
            .ok()
            .filter(|amount| *amount > 0)
            .ok_or_else(|| {
                CommandError::new(CommandErrorKind::InvalidArgument {
                    command: "gen",
                    argument: "amount",
                    value: raw_amount.to_string(),
                })
            })?;
        Ok(Command::Gen {
            tier: tier.to_string(),
            amount,
        })
    }

    fn parse_hwid(args: &str) -> Result<Self, CommandError> {
        let keys: Vec<String> = args
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect();
        if keys.is_empty() {
            return Err(missing("hwid", "keys"));
        }
        Ok(Command::Hwid { keys })
    }

    /// Command name as typed after the prefix.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Upload { .. } => "upload",
            Command::Gen { .. } => "gen",
            Command::ViewStock => "view_stock",
            Command::Hwid { .. } => "hwid",
            Command::Shutdown => "shutdown",
            Command::Help => "help",
        }
    }

    /// Role the author must hold, if any.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Command::Upload { .. } | Command::Shutdown => Some(Role::Issuer),
            Command::Gen { .. } | Command::ViewStock | Command::Hwid { .. } => {
                Some(Role::Consumer)
            }
            Command::Help => None,
        }
    }
}

#[track_caller]
fn missing(command: &'static str, argument: &'static str) -> CommandError {
    CommandError::new(CommandErrorKind::MissingArgument { command, argument })
}
