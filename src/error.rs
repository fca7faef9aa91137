use thiserror::Error;

/// Validation failures caused by what the user typed or pressed. Every variant
/// is answered with a corrective reply and never reaches the dispatcher.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UserInputError {
    #[error("task description is empty")]
    EmptyTaskText,

    #[error("task index is out of range or malformed")]
    InvalidIndex,

    #[error("expected a duration and a reminder text")]
    MissingArguments,

    #[error("duration does not match any supported format")]
    UnrecognizedFormat,

    #[error("selected task no longer exists")]
    SelectorStale,
}
