use std::path::PathBuf;

use thiserror::Error;

use crate::{
    EXIT_CONFIG_ERROR, EXIT_INTEGRITY_ERROR, EXIT_INTERNAL_ERROR, EXIT_IO_ERROR, EXIT_LOCKED,
};

#[derive(Error, Debug)]
pub enum RetentionsError {
    #[error("{0}")]
    Config(String),

    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid regex pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{}", format_io_error(source, path, operation))]
    Io {
        #[source]
        source: std::io::Error,
        path: Option<PathBuf>,
        operation: Option<&'static str>,
    },

    #[error("lock file '{}' exists, another run may be in progress", path.display())]
    Locked { path: PathBuf },

    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Formats IO error with optional context for display.
/// Uses references to Options as required by thiserror's `#[error(...)]` macro expansion.
#[allow(clippy::ref_option, clippy::ref_option_ref)]
fn format_io_error(
    source: &std::io::Error,
    path: &Option<PathBuf>,
    operation: &Option<&'static str>,
) -> String {
    match (path.as_ref(), *operation) {
        (Some(p), Some(op)) => format!("IO error ({op} '{}'): {source}", p.display()),
        (Some(p), None) => format!("IO error ('{}'): {source}", p.display()),
        (None, Some(op)) => format!("IO error ({op}): {source}"),
        (None, None) => format!("IO error: {source}"),
    }
}

impl From<std::io::Error> for RetentionsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            source: e,
            path: None,
            operation: None,
        }
    }
}

impl RetentionsError {
    /// Creates an IO error with path context.
    #[must_use]
    pub const fn io_with_path(source: std::io::Error, path: PathBuf) -> Self {
        Self::Io {
            source,
            path: Some(path),
            operation: None,
        }
    }

    /// Creates an IO error with path and operation context.
    #[must_use]
    pub const fn io_with_context(
        source: std::io::Error,
        path: PathBuf,
        operation: &'static str,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path),
            operation: Some(operation),
        }
    }

    /// Returns the process exit code for this error per the documented table.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidGlob { .. } | Self::InvalidRegex { .. } => {
                EXIT_CONFIG_ERROR
            }
            Self::Io { .. } => EXIT_IO_ERROR,
            Self::Locked { .. } => EXIT_LOCKED,
            Self::Integrity(_) => EXIT_INTEGRITY_ERROR,
            Self::Internal(_) => EXIT_INTERNAL_ERROR,
        }
    }

    /// Returns the error taxonomy class as a short string identifier.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::InvalidGlob { .. } | Self::InvalidRegex { .. } => {
                "Configuration"
            }
            Self::Io { .. } => "IO",
            Self::Locked { .. } => "Concurrency",
            Self::Integrity(_) => "Integrity",
            Self::Internal(_) => "Internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, RetentionsError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
