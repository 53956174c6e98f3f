use std::io;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("`{tool}` was not found on this system")]
    ToolNotFound { tool: String },

    #[error("`{tool}` did not answer within {timeout_ms} ms")]
    TimedOut { tool: String, timeout_ms: u64 },

    #[error("command exited with status {0}")]
    CommandFailed(i32),

    #[error("unexpected command output: {0}")]
    ParseFailed(String),

    #[error("no player selected")]
    NoPlayerSelected,

    #[error("I/O error: {0}")]
    Io(String),
}

impl ControlError {
    /// True for failures that mean the tool itself cannot be used right now.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ControlError::ToolNotFound { .. } | ControlError::TimedOut { .. }
        )
    }
}

impl From<io::Error> for ControlError {
    fn from(error: io::Error) -> Self {
        ControlError::Io(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_count_as_unavailable() {
        let err = ControlError::TimedOut {
            tool: "pactl".into(),
            timeout_ms: 100,
        };
        assert!(err.is_unavailable());
        assert!(!ControlError::CommandFailed(1).is_unavailable());
        assert!(!ControlError::NoPlayerSelected.is_unavailable());
    }
}
