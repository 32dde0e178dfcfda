//! Telegram command parsing.

use url::Url;

use crate::domain::InstrumentId;

/// Supported chat commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Start,
    Help,
    Source,
    /// `/p <coin>`
    Price(String),
    /// `/s <coin>`
    Supply(String),
    /// `/v <coin>`
    Volume(String),
    /// `/o <coin>` or `$<coin>`
    Overview(String),
    /// `/alert <coin|link> <target>`
    Alert { coin: String, target: String },
    /// `/alert list`
    AlertList,
}

/// Parse error for chat messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    NotACommand,
    UnknownCommand(String),
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotACommand => write!(f, "message is not a command"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command `{cmd}`"),
            Self::MissingArgument { command, argument } => {
                write!(f, "missing argument `{argument}` for `{command}`")
            }
        }
    }
}

impl std::error::Error for CommandParseError {}

/// Parse a chat message into a bot command.
///
/// Commands may carry an `@botname` suffix. A message starting with `$` is
/// shorthand for `/o`.
pub fn parse_command(text: &str) -> Result<ChatCommand, CommandParseError> {
    let text = text.trim();

    if let Some(rest) = text.strip_prefix('$') {
        return first_word(rest)
            .map(ChatCommand::Overview)
            .ok_or(CommandParseError::MissingArgument {
                command: "$",
                argument: "coin",
            });
    }

    let (raw_command, args) = match text.split_once(char::is_whitespace) {
        Some((cmd, args)) => (cmd, args.trim()),
        None => (text, ""),
    };
    if !raw_command.starts_with('/') {
        return Err(CommandParseError::NotACommand);
    }

    let command = raw_command
        .split_once('@')
        .map_or(raw_command, |(head, _)| head);

    match command {
        "/start" => Ok(ChatCommand::Start),
        "/help" => Ok(ChatCommand::Help),
        "/source" => Ok(ChatCommand::Source),
        "/p" => coin_argument("/p", args).map(ChatCommand::Price),
        "/s" => coin_argument("/s", args).map(ChatCommand::Supply),
        "/v" => coin_argument("/v", args).map(ChatCommand::Volume),
        "/o" => first_word(args)
            .map(ChatCommand::Overview)
            .ok_or(CommandParseError::MissingArgument {
                command: "/o",
                argument: "coin",
            }),
        "/alert" => parse_alert(args),
        other => Err(CommandParseError::UnknownCommand(other.to_string())),
    }
}

fn coin_argument(command: &'static str, args: &str) -> Result<String, CommandParseError> {
    if args.is_empty() {
        Err(CommandParseError::MissingArgument {
            command,
            argument: "coin",
        })
    } else {
        Ok(args.to_string())
    }
}

fn first_word(args: &str) -> Option<String> {
    args.split_whitespace().next().map(str::to_string)
}

fn parse_alert(args: &str) -> Result<ChatCommand, CommandParseError> {
    let (coin, target) = match args.split_once(char::is_whitespace) {
        Some((coin, target)) => (coin, target.trim()),
        None => (args, ""),
    };

    if coin.is_empty() {
        return Err(CommandParseError::MissingArgument {
            command: "/alert",
            argument: "coin",
        });
    }
    if coin == "list" && target.is_empty() {
        return Ok(ChatCommand::AlertList);
    }
    if target.is_empty() {
        return Err(CommandParseError::MissingArgument {
            command: "/alert",
            argument: "target",
        });
    }

    Ok(ChatCommand::Alert {
        coin: coin.to_string(),
        target: target.to_string(),
    })
}

/// Extract the instrument id from a CoinPaprika coin page link.
///
/// Accepts `coinpaprika.com/coin/<id>` and the localized `waluta` and
/// `valjuta` paths, with or without scheme and `www.`.
pub fn parse_coin_link(text: &str) -> Option<InstrumentId> {
    let text = text.trim();
    let url = if text.contains("://") {
        Url::parse(text).ok()?
    } else {
        Url::parse(&format!("https://{text}")).ok()?
    };

    let host = url.host_str()?;
    if host != "coinpaprika.com" && host != "www.coinpaprika.com" {
        return None;
    }

    let mut segments = url.path_segments()?;
    if !matches!(segments.next()?, "coin" | "waluta" | "valjuta") {
        return None;
    }
    let id = segments.next()?;
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    valid.then(|| InstrumentId::from(id))
}

/// Help text returned by `/start`, `/help` and unknown commands.
#[must_use]
pub const fn command_help() -> &'static str {
    "📋 Commands\n\n\
    /p <coin> - 💵 Price in USD and BTC\n\
    /s <coin> - 🪙 Circulating supply\n\
    /v <coin> - 📊 24h trading volume\n\
    /o <coin> or $<coin> - 🔎 Ticker overview\n\
    /alert <coin> <target> - 🔔 Alert at a price (e.g. 70000) or a move (e.g. 10% or -5%)\n\
    /alert list - 📝 Your active alerts\n\
    /source - 🧑‍💻 Source code\n\
    /help - ❓ Show this message"
}

/// Bot commands for Telegram menu registration.
///
/// Returns tuples of (command, description) for `set_my_commands`.
#[must_use]
pub fn bot_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("p", "Price in USD and BTC"),
        ("s", "Circulating supply"),
        ("v", "24h trading volume"),
        ("o", "Ticker overview"),
        ("alert", "Create or list price alerts"),
        ("source", "Source code"),
        ("help", "Show all commands"),
    ]
}
