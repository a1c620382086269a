//! Main package build orchestration.
//!
//! [`PackageBuilder`] runs the macOS installer pipeline for one set of
//! [`Settings`] and reports the resulting artifact with its size and
//! checksum.

use crate::bundler::{
    PackageArtifact, Result, Settings,
    error::ErrorExt,
    platform::macos::pkg,
    utils::command::{CommandRunner, SystemRunner},
};
use std::path::Path;

use super::{checksum::calculate_sha256, signing::NotarizationAuth, tool_detection::HAS_XCRUN};

/// Installer package builder.
///
/// Generic over the [`CommandRunner`] so the full pipeline can be observed
/// without the macOS packaging tools installed.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_pkg::bundler::{PackageBuilder, PkgConfig, SettingsBuilder, SystemRunner};
/// use std::path::Path;
///
/// # async fn example(config: PkgConfig) -> kodegen_bundler_pkg::bundler::Result<()> {
/// let settings = SettingsBuilder::new().config(config).build()?;
/// let builder = PackageBuilder::new(settings, SystemRunner)?;
///
/// let artifact = builder.build(Path::new("dist/Kodegen.pkg")).await?;
/// println!("Created: {} ({} bytes)", artifact.path.display(), artifact.size);
/// println!("SHA256: {}", artifact.checksum);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PackageBuilder<R = SystemRunner> {
    settings: Settings,
    runner: R,
    auth: Option<NotarizationAuth>,
}

impl<R: CommandRunner> PackageBuilder<R> {
    /// Creates a builder, resolving notarization credentials up front.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotarizeAuth`](crate::bundler::Error::NotarizeAuth)
    /// when notarization is enabled and no complete set of credentials is
    /// configured, so a build never starts that cannot be notarized.
    pub fn new(settings: Settings, runner: R) -> Result<Self> {
        let auth = if settings.notarize().skip_notarization {
            None
        } else {
            if !*HAS_XCRUN && settings.tools().xcrun == "xcrun" {
                log::warn!("xcrun not found in PATH; notarization will fail");
            }
            Some(NotarizationAuth::from_env(
                settings.notarize().profile.as_deref(),
            )?)
        };

        Ok(Self::with_auth(settings, runner, auth))
    }

    /// Creates a builder with explicit notarization credentials.
    pub fn with_auth(settings: Settings, runner: R, auth: Option<NotarizationAuth>) -> Self {
        Self {
            settings,
            runner,
            auth,
        }
    }

    /// Returns the settings this builder uses.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Builds the installer at `target`.
    ///
    /// The staging directory is rebuilt from scratch. Any failing external
    /// command aborts the build; nothing already written is cleaned up.
    pub async fn build(&self, target: &Path) -> Result<PackageArtifact> {
        log::info!(
            "Building installer package {} {}",
            self.settings.pkg_id(),
            self.settings.version_string()
        );

        let path = pkg::bundle_project(&self.runner, &self.settings, self.auth.as_ref(), target)
            .await?;

        let size = tokio::fs::metadata(&path)
            .await
            .fs_context("reading installer metadata", &path)?
            .len();
        let checksum = calculate_sha256(&path).await?;

        log::info!("✓ Created {} ({} bytes)", path.display(), size);

        Ok(PackageArtifact {
            path,
            size,
            checksum,
        })
    }
}
