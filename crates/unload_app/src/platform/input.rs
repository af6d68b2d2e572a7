use std::path::PathBuf;

/// Lines starting with this character are operator commands, never scans.
pub const COMMAND_PREFIX: char = ':';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Blank,
    Scan(String),
    Command(Command),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load(PathBuf),
    Export,
    Status,
    /// Stop treating lines as scans until `Resume`; the session is kept.
    Pause,
    Resume,
    Help,
    Quit,
    /// Unrecognised or malformed command, with a message for the operator.
    Invalid(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Blank;
    }
    match line.strip_prefix(COMMAND_PREFIX) {
        Some(command) => Input::Command(parse_command(command)),
        None => Input::Scan(line.to_owned()),
    }
}

fn parse_command(text: &str) -> Command {
    let (name, arg) = match text.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (text, ""),
    };
    match (name.to_ascii_lowercase().as_str(), arg) {
        ("load" | "l", "") => Command::Invalid("usage: :load <manifest.csv>".to_owned()),
        ("load" | "l", path) => Command::Load(PathBuf::from(path)),
        ("export" | "e", "") => Command::Export,
        ("status" | "s", "") => Command::Status,
        ("pause" | "p", "") => Command::Pause,
        ("resume" | "r", "") => Command::Resume,
        ("help" | "h" | "?", "") => Command::Help,
        ("quit" | "q" | "exit", "") => Command::Quit,
        _ => Command::Invalid(format!("unknown command ':{text}'; type :help")),
    }
}
