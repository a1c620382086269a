//! Error types for the command line tool.
//!
//! This module defines the top-level error with actionable messages and
//! recovery suggestions.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for the command line tool
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Package build errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error;

        match self {
            BundlerError::Cli(CliError::InvalidArguments { .. }) => {
                vec!["Run with --help to see the accepted arguments".to_string()]
            }
            BundlerError::Cli(CliError::ExecutionFailed { .. }) | BundlerError::Toml(_) => vec![
                "Check that the configuration file exists and is valid TOML".to_string(),
                "Pass a different file with --config or KODEGEN_PKG_CONFIG".to_string(),
            ],
            BundlerError::Bundler(e) if e.is_config() => vec![
                "Set version (or pass --pkg-version) and either pkg_id or app_id".to_string(),
                "pkg_apps entries are a path or [source, name]; pkg_files entries are a path or [source, dest]".to_string(),
            ],
            BundlerError::Bundler(Error::ToolNotFound { tool, .. }) => vec![
                format!("Install {tool} (xcode-select --install) or set its path under [tools]"),
            ],
            BundlerError::Bundler(Error::NotarizeAuth(_)) => vec![
                "Set notarize_profile, or export APPLE_API_KEY/APPLE_API_ISSUER/APPLE_API_KEY_PATH".to_string(),
                "Pass --skip-notarization for local builds".to_string(),
            ],
            BundlerError::Bundler(Error::Template(_)) => vec![
                "Every %(key)s in the distribution template must name a configured string option".to_string(),
                "Write a literal percent sign as %%".to_string(),
            ],
            BundlerError::Bundler(Error::CommandFailed { .. }) => vec![
                "Re-run with RUST_LOG=debug to see the exact command line".to_string(),
                "Check that the signing identities exist: security find-identity -v".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
