//! Core Settings struct and implementations.

use super::{AppInstall, FileInstall, NotarizeSettings, SigningSettings, ToolSettings};
use crate::bundler::platform::macos::pkg::xml_escape;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Staging directory used when none is configured.
pub const DEFAULT_STAGING_DIR: &str = "build/pkg";

/// Install location used when `pkg_install_to` is not set.
pub const DEFAULT_INSTALL_LOCATION: &str = "/";

/// Validated settings for one installer package build.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder), which resolves
/// the package identifier and rejects configurations without a version, so a
/// `Settings` value always describes a buildable package.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_pkg::bundler::{PkgConfig, SettingsBuilder};
///
/// # fn example() -> kodegen_bundler_pkg::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .config(PkgConfig {
///         app_id: Some("ai.kodegen.app".into()),
///         version: Some("1.0.0".into()),
///         ..Default::default()
///     })
///     .build()?;
///
/// assert_eq!(settings.pkg_id(), "ai.kodegen.app.pkg");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    pub(super) pkg_id: String,
    pub(super) version: String,
    pub(super) package_name: String,
    pub(super) install_location: String,
    pub(super) staging_dir: PathBuf,
    pub(super) apps: Vec<AppInstall>,
    pub(super) files: Vec<FileInstall>,
    pub(super) resources: Vec<FileInstall>,
    pub(super) scripts: Option<PathBuf>,
    pub(super) component_plist: Option<PathBuf>,
    pub(super) distribution_template: Option<PathBuf>,
    pub(super) signing: SigningSettings,
    pub(super) notarize: NotarizeSettings,
    pub(super) tools: ToolSettings,

    /// Unescaped text values available to the distribution template.
    pub(super) text_values: BTreeMap<String, String>,
}

impl Settings {
    /// Returns the resolved component package identifier.
    pub fn pkg_id(&self) -> &str {
        &self.pkg_id
    }

    /// Returns the version string.
    pub fn version_string(&self) -> &str {
        &self.version
    }

    /// Returns the component package base name.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Returns the `pkgbuild --install-location` value.
    pub fn install_location(&self) -> &str {
        &self.install_location
    }

    /// Returns the staging directory.
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Application bundles to stage under `root/Applications`.
    pub fn apps(&self) -> &[AppInstall] {
        &self.apps
    }

    /// Files to stage under `root`.
    pub fn files(&self) -> &[FileInstall] {
        &self.files
    }

    /// Files to stage under `Resources`.
    pub fn resources(&self) -> &[FileInstall] {
        &self.resources
    }

    /// Returns the installer scripts directory.
    pub fn scripts(&self) -> Option<&Path> {
        self.scripts.as_deref()
    }

    /// Returns the component property list.
    pub fn component_plist(&self) -> Option<&Path> {
        self.component_plist.as_deref()
    }

    /// Returns the distribution manifest template.
    pub fn distribution_template(&self) -> Option<&Path> {
        self.distribution_template.as_deref()
    }

    /// Returns the signing settings.
    pub fn signing(&self) -> &SigningSettings {
        &self.signing
    }

    /// Returns the notarization settings.
    pub fn notarize(&self) -> &NotarizeSettings {
        &self.notarize
    }

    /// Returns the external tool names.
    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    /// XML-attribute-escaped text values keyed by option name.
    ///
    /// This is the substitution mapping for `%(key)s` placeholders in the
    /// distribution template.
    pub fn template_values(&self) -> BTreeMap<String, String> {
        self.text_values
            .iter()
            .map(|(key, value)| (key.clone(), xml_escape(value)))
            .collect()
    }
}
