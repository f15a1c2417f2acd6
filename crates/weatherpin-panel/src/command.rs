use crate::error::PanelError;

/// User actions on the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit button with the given input
    Submit(String),
    /// Enter pressed in the input field; same path as `Submit`
    Enter(String),
    Pin,
    /// Refresh the pinned entry at a 1-based position
    Refresh(usize),
    /// Delete the pinned entry at a 1-based position
    Delete(usize),
    Help,
    Quit,
}

impl Command {
    /// Parse one line of terminal input.
    ///
    /// A line that isn't a known command is city input followed by Enter,
    /// so an empty line is an empty submit.
    pub fn parse(line: &str) -> Result<Self, PanelError> {
        let trimmed = line.trim();
        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (trimmed, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "get" => Ok(Command::Submit(rest.to_string())),
            "pin" if rest.is_empty() => Ok(Command::Pin),
            "refresh" => position("refresh", rest).map(Command::Refresh),
            "delete" | "del" => position("delete", rest).map(Command::Delete),
            "help" | "?" if rest.is_empty() => Ok(Command::Help),
            "quit" | "exit" if rest.is_empty() => Ok(Command::Quit),
            _ => Ok(Command::Enter(line.to_string())),
        }
    }
}

fn position(command: &str, arg: &str) -> Result<usize, PanelError> {
    if arg.is_empty() {
        return Err(PanelError::MissingArgument(command.to_string()));
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(PanelError::InvalidPosition(arg.to_string())),
    }
}

pub const HELP_TEXT: &str = "\
Commands:
  <city>          fetch weather for a city (Enter)
  get <city>      same as above
  pin             pin the current result
  refresh <n>     refresh pinned entry n
  delete <n>      delete pinned entry n
  help            show this help
  quit            exit";
