//! Error types for packaging operations.
//!
//! Provides contextual error chaining, filesystem errors that carry the
//! offending path, and distinct variants for configuration problems versus
//! failures of the external packaging tools.
//!
//! # Features
//!
//! - **Context trait**: Add context to errors similar to anyhow
//! - **ErrorExt trait**: Filesystem operations with automatic path context
//! - **bail! macro**: Early return with formatted error messages
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_pkg::bundler::{ErrorExt, Result};
//! use std::path::Path;
//!
//! fn read_template(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).fs_context("reading distribution template", path)
//! }
//! ```

use std::{
    fmt::Display,
    io,
    path::{self, PathBuf},
    time::Duration,
};
use thiserror::Error as DeriveError;

/// Errors returned by the package builder.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// A required option is missing or an option has an invalid shape.
    ///
    /// Always raised while building [`Settings`](crate::bundler::Settings),
    /// before the staging tree is touched or any tool runs.
    #[error("configuration error: {0}")]
    Config(String),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "copying app bundle")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// The external tool could not be started.
    #[error("failed to run command {command}: {error}")]
    CommandSpawn {
        /// Command that failed to execute
        command: String,
        /// The underlying error
        error: io::Error,
    },

    /// The external tool ran and exited unsuccessfully.
    #[error("command {command} exited with {status}: {stderr}")]
    CommandFailed {
        /// Command line that failed
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// The external tool did not finish within its time bound.
    #[error("command {command} timed out after {}s", .timeout.as_secs())]
    CommandTimeout {
        /// Command line that timed out
        command: String,
        /// The bound that was exceeded
        timeout: Duration,
    },

    /// Required tool is not installed or not on `PATH`.
    #[error("{tool} not found: {error}")]
    ToolNotFound {
        /// Tool name as configured
        tool: String,
        /// Lookup failure
        error: which::Error,
    },

    /// Distribution template could not be rendered.
    #[error("distribution template error: {0}")]
    Template(String),

    /// Notarization was rejected or returned an unexpected result.
    #[error("notarization failed: {0}")]
    Notarization(String),

    /// Notarization credentials are missing or incomplete.
    #[error("failed to notarize package: {0}")]
    NotarizeAuth(#[from] NotarizeAuthError),

    /// Generic I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Error walking directory (used when copying trees).
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripError(#[from] path::StripPrefixError),

    /// Invalid glob pattern in `sign_apps` / `sign_tools`.
    #[error("{0}")]
    GlobPattern(#[from] glob::PatternError),

    /// Glob execution error.
    #[error("{0}")]
    Glob(#[from] glob::GlobError),

    /// JSON deserialization error (notarytool output).
    #[error("{0}")]
    JsonError(#[from] serde_json::error::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

/// Notarization authentication errors.
///
/// Provides clear error messages for missing Apple Developer credentials.
#[derive(Debug, thiserror::Error)]
pub enum NotarizeAuthError {
    /// Team ID required for app-specific password authentication.
    #[error(
        "The team ID is required for notarization with app-specific password. \
         Please set the APPLE_TEAM_ID environment variable. \
         You can find your team ID at https://developer.apple.com/account#MembershipDetailsCard"
    )]
    TeamId,

    /// API key file not configured.
    #[error("could not find API key file for key {key_id}. Please set APPLE_API_KEY_PATH")]
    ApiKey {
        /// Key ID that has no key file
        key_id: String,
    },

    /// No notarization credentials found.
    #[error(
        "no notarization credentials found. Please set either: \
         (1) notarize_profile in the package config, \
         (2) APPLE_API_KEY, APPLE_API_ISSUER, and APPLE_API_KEY_PATH or \
         (3) APPLE_ID, APPLE_PASSWORD, and APPLE_TEAM_ID"
    )]
    Credentials,
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for adding context to errors.
///
/// Similar to `anyhow::Context` but integrated with the bundler's Error type.
/// Works with both `Result<T, E>` and `Option<T>`.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "copying app bundle".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

impl Error {
    /// Returns true for errors raised while validating configuration.
    pub fn is_config(&self) -> bool {
        match self {
            Error::Config(_) => true,
            Error::Context(_, inner) => inner.is_config(),
            _ => false,
        }
    }
}

/// Macro for early return with error.
///
/// Converts the message into a [`Error::GenericError`] and returns immediately.
///
/// # Examples
///
/// ```ignore
/// bail!("operation failed");
/// bail!("invalid value: {}", value);
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::error::Error::GenericError($msg.into()))
    };
    ($err:expr $(,)?) => {
        return Err($crate::bundler::error::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::error::Error::GenericError(format!($fmt, $($arg)*)))
    };
}

/// Early return with [`Error::Config`].
#[macro_export]
macro_rules! config_bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::error::Error::Config(format!($($arg)*)))
    };
}
