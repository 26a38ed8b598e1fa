//! Shared CLI error and exit-code types.

use std::fmt;

/// Result type for CLI command execution.
pub type CliResult<T> = Result<T, CliError>;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed successfully
    Success,
    /// Command failed (missing dependency, failed delivery, bad input)
    Failure,
}

impl ExitCode {
    /// Numeric code for `std::process::exit`.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }
}

/// Error from a CLI command, carrying a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// File system or subprocess I/O failure
    Io(String),
    /// Invalid input or state
    Validation(String),
    /// A required external executable is missing
    MissingDependency(String),
}

impl CliError {
    /// Creates an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a missing-dependency error.
    #[must_use]
    pub fn missing_dependency(message: impl Into<String>) -> Self {
        Self::MissingDependency(message.into())
    }

    /// The exit code this error maps to.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::Failure
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) | Self::Validation(msg) | Self::MissingDependency(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::Failure.code(), 1);
        assert_eq!(CliError::io("x").exit_code(), ExitCode::Failure);
    }

    #[test]
    fn test_display_uses_message() {
        assert_eq!(CliError::validation("bad input").to_string(), "bad input");
    }
}
