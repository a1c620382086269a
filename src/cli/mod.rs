//! Command line interface for the installer package builder.
//!
//! Parses arguments, loads the package configuration, applies overrides and
//! runs one build, reporting the artifact on success.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::{PackageBuilder, SettingsBuilder, SystemRunner};
use crate::error::{CliError, Result};
use crate::metadata::load_config;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(&args).await
}

/// Runs one build for already-parsed arguments.
pub async fn execute(args: &Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let runtime = RuntimeConfig::from(args);
    let out = runtime.output();

    out.verbose(&format!("Loading configuration from {}", args.config.display()))?;
    let config = load_config(&args.config)?;

    let mut builder = SettingsBuilder::new()
        .config(config)
        .sign_disable(args.sign_disable)
        .skip_notarization(args.skip_notarization);
    if let Some(version) = &args.pkg_version {
        builder = builder.version(version);
    }
    if let Some(dir) = &args.staging_dir {
        builder = builder.staging_dir(dir);
    }
    let settings = builder.build()?;

    out.section(&format!(
        "{} {}",
        settings.package_name(),
        settings.version_string()
    ))?;
    out.verbose(&format!("Identifier: {}", settings.pkg_id()))?;
    out.verbose(&format!("Staging: {}", settings.staging_dir().display()))?;
    if settings.signing().disabled {
        out.warn("Signing disabled")?;
    }
    if settings.notarize().skip_notarization {
        out.warn("Notarization skipped")?;
    }

    let artifact = PackageBuilder::new(settings, SystemRunner)?
        .build(&args.output)
        .await?;

    out.success(&format!("Created {}", artifact.path.display()))?;
    out.indent(&format!("Size: {} bytes", artifact.size))?;
    out.indent(&format!("SHA256: {}", artifact.checksum))?;

    Ok(0)
}
