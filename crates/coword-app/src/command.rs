//! Line command parsing.
//!
//! Lines starting with `/` are commands. Anything else is a guess: its letters
//! are typed one by one and then submitted.

use coword_proto::GameId;

/// Parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/connect`
    Connect,
    /// `/disconnect`
    Disconnect,
    /// `/create`
    Create,
    /// `/join <ID>`
    Join {
        /// Code of the match to join.
        game_id: GameId,
    },
    /// `/new`
    NewGame,
    /// `/leave`
    Leave,
    /// `/back` deletes the last typed letter.
    Back,
    /// `/dismiss <n>` removes the n-th visible notification (1-based).
    Dismiss {
        /// Position in the visible list.
        index: usize,
    },
    /// `/quit`
    Quit,
    /// Plain text, typed then submitted.
    Guess {
        /// Raw text.
        word: String,
    },
    /// Unrecognised `/` command.
    Unknown {
        /// Input as typed.
        input: String,
    },
    /// Known command with bad arguments.
    InvalidArgs {
        /// Command name without the slash.
        command: &'static str,
        /// What was wrong.
        error: String,
    },
}

/// Parse one input line.
pub fn parse(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Guess { word: line.to_string() };
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match name {
        "connect" => no_args("connect", &args, Command::Connect),
        "disconnect" => no_args("disconnect", &args, Command::Disconnect),
        "create" => no_args("create", &args, Command::Create),
        "new" => no_args("new", &args, Command::NewGame),
        "leave" => no_args("leave", &args, Command::Leave),
        "back" => no_args("back", &args, Command::Back),
        "quit" | "q" => no_args("quit", &args, Command::Quit),
        "join" => match args.as_slice() {
            [id] => Command::Join { game_id: GameId::new(id.to_ascii_uppercase()) },
            _ => invalid("join", "usage: /join <ID>"),
        },
        "dismiss" => match args.as_slice() {
            [n] => match n.parse::<usize>() {
                Ok(index) if index > 0 => Command::Dismiss { index },
                _ => invalid("dismiss", format!("{n:?} is not a positive number")),
            },
            _ => invalid("dismiss", "usage: /dismiss <n>"),
        },
        _ => Command::Unknown { input: line.to_string() },
    }
}

fn no_args(command: &'static str, args: &[&str], parsed: Command) -> Command {
    if args.is_empty() { parsed } else { invalid(command, "takes no arguments") }
}

fn invalid(command: &'static str, error: impl Into<String>) -> Command {
    Command::InvalidArgs { command, error: error.into() }
}
