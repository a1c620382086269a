//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with the
//! configuration file path overridable from the environment.

use clap::Parser;
use std::path::PathBuf;

/// Signed, notarized macOS installer packages
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_pkg",
    version,
    about = "Builds signed and notarized macOS installer packages (.pkg)",
    long_about = "Stages app bundles, files and installer resources, signs them, runs pkgbuild and productbuild, then notarizes and staples the installer.

Usage:
  kodegen_bundler_pkg --output dist/Kodegen.pkg
  kodegen_bundler_pkg --config Cargo.toml --output dist/Kodegen.pkg --pkg-version 1.2.0
  kodegen_bundler_pkg --output dist/Kodegen.pkg --sign-disable --skip-notarization

Exit code 0 = artifact guaranteed to exist at output path."
)]
pub struct Args {
    /// Package configuration (standalone TOML or Cargo.toml with [package.metadata.pkg])
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = "KODEGEN_PKG_CONFIG",
        default_value = "pkg.toml"
    )]
    pub config: PathBuf,

    /// Output path for the installer package
    ///
    /// Parent directories are created if they don't exist.
    ///
    /// Contract: Exit code 0 guarantees the artifact exists at this path.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: PathBuf,

    /// Package version, overriding the configured version
    #[arg(long, value_name = "VERSION")]
    pub pkg_version: Option<String>,

    /// Staging directory, overriding the configured one
    #[arg(long, value_name = "DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Disable all code and installer signing
    #[arg(long)]
    pub sign_disable: bool,

    /// Skip notarization and stapling
    #[arg(long)]
    pub skip_notarization: bool,

    /// Show detailed progress
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.output.file_name().is_none() {
            return Err(format!(
                "Output path {} does not name a file",
                self.output.display()
            ));
        }

        if self
            .output
            .extension()
            .is_none_or(|ext| !ext.eq_ignore_ascii_case("pkg"))
        {
            return Err(format!(
                "Output path {} must end in .pkg",
                self.output.display()
            ));
        }

        if let Some(version) = &self.pkg_version
            && version.trim().is_empty()
        {
            return Err("--pkg-version cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}
