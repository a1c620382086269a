//! macOS installer package builder library
//!
//! This library provides the core packaging functionality for creating
//! signed and notarized flat installer packages (.pkg) from staged
//! application bundles, files and installer resources.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
