use thiserror::Error;

/// Errors from commands the panel cannot carry out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("'{0}' needs an entry number")]
    MissingArgument(String),

    #[error("'{0}' is not a valid entry number")]
    InvalidPosition(String),

    #[error("No pinned entry at position {0}")]
    NoSuchEntry(usize),
}
