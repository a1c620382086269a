//! macOS installer package builder.
//!
//! Stages application bundles, files and installer resources, signs them,
//! builds a component package with `pkgbuild`, assembles the final flat
//! installer with `productbuild`, then notarizes and staples it.
//!
//! # Configuration
//!
//! Configured via a standalone `pkg.toml` or `[package.metadata.pkg]` in
//! `Cargo.toml`:
//!
//! ```toml
//! [package.metadata.pkg]
//! app_id = "ai.kodegen.app"
//! pkg_apps = [["target/bundle/Kodegen.app", "Kodegen.app"]]
//! pkg_distribution = "installer/distribution.xml"
//! sign_apps = ["Applications/*.app"]
//! sign_id_app = "Developer ID Application: Example (TEAMID)"
//! sign_id_installer = "Developer ID Installer: Example (TEAMID)"
//! ```
//!
//! # Integration
//!
//! ```no_run
//! use kodegen_bundler_pkg::bundler::{PackageBuilder, SettingsBuilder, SystemRunner};
//! use kodegen_bundler_pkg::metadata::load_config;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(Path::new("pkg.toml"))?;
//! let settings = SettingsBuilder::new().config(config).build()?;
//!
//! let artifact = PackageBuilder::new(settings, SystemRunner)?
//!     .build(Path::new("dist/Kodegen.pkg"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod builder;
pub mod error;
pub(crate) mod platform;
mod settings;
mod utils;

// Public re-exports
pub use builder::{NotarizationAuth, PackageBuilder};
pub use error::{Context, Error, ErrorExt, NotarizeAuthError, Result};
pub use platform::macos::pkg::{render_template, xml_escape};
pub use settings::{
    AppEntry, AppInstall, DEFAULT_INSTALL_LOCATION, DEFAULT_STAGING_DIR, FileEntry, FileInstall,
    NotarizeSettings, PkgConfig, ResourceSpec, Settings, SettingsBuilder, SigningSettings,
    ToolSettings,
};
pub use utils::command::{CommandOutput, CommandRunner, SystemRunner, ToolCommand};

/// The installer produced by a successful build.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_pkg::bundler::{PackageBuilder, Settings, SystemRunner};
/// use std::path::Path;
///
/// # async fn example(settings: Settings) -> kodegen_bundler_pkg::bundler::Result<()> {
/// let artifact = PackageBuilder::new(settings, SystemRunner)?
///     .build(Path::new("Kodegen.pkg"))
///     .await?;
/// println!("SHA256: {}", artifact.checksum);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageArtifact {
    /// Path of the installer package.
    pub path: std::path::PathBuf,

    /// Size of the installer in bytes.
    pub size: u64,

    /// SHA-256 checksum of the installer, hex-encoded.
    pub checksum: String,
}
