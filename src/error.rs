use thiserror::Error;
use tracing::{error, warn};

/// Error severity for UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,     // informational
    Warning,  // recoverable
    Error,    // operation failed
    Critical, // requires user action
}

/// Domain-specific errors for Climpt
#[derive(Error, Debug)]
pub enum ClimptError {
    #[error("Prompt storage failed for '{path}': {source}")]
    Storage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Prompt file is not valid JSON: {0}")]
    StorageParse(#[from] serde_json::Error),

    #[error("Invalid prompt data: {0}")]
    StorageValidation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Clipboard operation failed: {0}")]
    Clipboard(String),

    #[error("Hotkey registration failed: {0}")]
    Hotkey(String),

    #[error("Theme loading failed for '{path}': {message}")]
    ThemeLoad { path: String, message: String },

    #[error("File watch error: {0}")]
    FileWatch(String),
}

impl ClimptError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Storage { .. } => ErrorSeverity::Error,
            Self::StorageParse(_) => ErrorSeverity::Error,
            Self::StorageValidation(_) => ErrorSeverity::Error,
            Self::Config(_) => ErrorSeverity::Warning,
            Self::Clipboard(_) => ErrorSeverity::Error,
            Self::Hotkey(_) => ErrorSeverity::Warning,
            Self::ThemeLoad { .. } => ErrorSeverity::Warning,
            Self::FileWatch(_) => ErrorSeverity::Warning,
        }
    }

    /// Message suitable for the modal error dialog.
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage { path, source } => {
                format!("Could not read or write {}: {}", path, source)
            }
            Self::StorageParse(e) => format!("Prompt file is corrupt: {}", e),
            Self::StorageValidation(msg) => format!("Prompts were not saved: {}", msg),
            Self::Config(msg) => format!("Configuration issue: {}", msg),
            Self::Clipboard(msg) => format!("Could not access the clipboard: {}", msg),
            Self::Hotkey(msg) => msg.clone(),
            Self::ThemeLoad { path, .. } => format!("Could not load theme from {}", path),
            Self::FileWatch(msg) => format!("File watcher issue: {}", msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClimptError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the user doesn't need to know.
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?err,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?err,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_severe() {
        let err = ClimptError::Storage {
            path: "/tmp/prompts.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert!(err.user_message().contains("/tmp/prompts.json"));
    }

    #[test]
    fn hotkey_errors_are_warnings() {
        let err = ClimptError::Hotkey("alt+p is taken".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(err.user_message(), "alt+p is taken");
    }

    #[test]
    fn log_err_returns_some_on_ok() {
        let result: std::result::Result<i32, String> = Ok(42);
        assert_eq!(result.log_err(), Some(42));
    }

    #[test]
    fn log_err_returns_none_on_err() {
        let result: std::result::Result<i32, String> = Err("nope".to_string());
        assert_eq!(result.log_err(), None);
    }

    #[test]
    fn warn_on_err_returns_none_on_err() {
        let result: std::result::Result<(), &str> = Err("expected");
        assert_eq!(result.warn_on_err(), None);
    }
}
