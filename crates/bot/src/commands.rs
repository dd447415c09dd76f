//! Slash-command vocabulary and parsing.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Info,
    Status,
    Whoami,
    Stats,
    Plogs,
}

impl Command {
    /// Action tag recorded in the activity log for this command.
    pub fn action(self) -> &'static str {
        match self {
            Self::Start => "START_COMMAND",
            Self::Help => "HELP_COMMAND",
            Self::Info => "INFO_COMMAND",
            Self::Status => "STATUS_COMMAND",
            Self::Whoami => "WHOAMI_COMMAND",
            Self::Stats => "STATS_COMMAND",
            Self::Plogs => "PLOGS_COMMAND",
        }
    }
}

/// A recognized leading `/command` token. `target` carries the `@botname`
/// suffix used in groups to address one bot; the dispatcher drops commands
/// aimed at somebody else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: Command,
    pub target: Option<String>,
}

/// Parse the first token of a message as a command. Anything that is not
/// a known command name returns `None`; command-shaped text never falls
/// through to the number search.
pub fn parse(text: &str) -> Option<ParsedCommand> {
    let first = text.split_whitespace().next()?;
    let body = first.strip_prefix('/')?;
    let (name, target) = match body.split_once('@') {
        Some((name, target)) => (name, Some(target.to_string())),
        None => (body, None),
    };
    let command = match name.to_ascii_lowercase().as_str() {
        "start" => Command::Start,
        "help" => Command::Help,
        "info" => Command::Info,
        "status" => Command::Status,
        "whoami" => Command::Whoami,
        "stats" => Command::Stats,
        "plogs" => Command::Plogs,
        _ => return None,
    };
    Some(ParsedCommand { command, target })
}
