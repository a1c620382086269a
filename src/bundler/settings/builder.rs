//! Builder for constructing Settings.

use super::{
    AppEntry, FileEntry, PkgConfig, Settings, SigningSettings,
    core::{DEFAULT_INSTALL_LOCATION, DEFAULT_STAGING_DIR},
    package::non_empty,
};
use crate::{bundler::Result, config_bail};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Takes the raw [`PkgConfig`] plus command-line overrides and validates
/// everything up front: identifier resolution, version presence, entry shapes
/// and signing identities. A failing `build()` never touches the filesystem.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_pkg::bundler::{PkgConfig, SettingsBuilder};
///
/// # fn example(config: PkgConfig) -> kodegen_bundler_pkg::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .config(config)
///     .version("2.0.1")
///     .staging_dir("target/pkg-staging")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    config: PkgConfig,
    version: Option<String>,
    staging_dir: Option<PathBuf>,
    sign_disable: bool,
    skip_notarization: bool,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the package configuration.
    pub fn config(mut self, config: PkgConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the configured version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Overrides the configured staging directory.
    pub fn staging_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.staging_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Disables all signing, regardless of configuration.
    pub fn sign_disable(mut self, disable: bool) -> Self {
        self.sign_disable = disable;
        self
    }

    /// Skips notarization, regardless of configuration.
    pub fn skip_notarization(mut self, skip: bool) -> Self {
        self.skip_notarization = skip;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::bundler::Error::Config) if:
    /// - neither `pkg_id` nor `app_id` is set
    /// - `version` is missing or empty
    /// - a `pkg_apps`, `pkg_files` or `pkg_resources` entry has the wrong shape
    /// - signing patterns are configured without `sign_id_app`
    pub fn build(self) -> Result<Settings> {
        let config = self.config;

        let pkg_id = match (non_empty(&config.pkg_id), non_empty(&config.app_id)) {
            (Some(pkg_id), _) => pkg_id,
            (None, Some(app_id)) => format!("{app_id}.pkg"),
            (None, None) => config_bail!("neither pkg_id nor app_id is set"),
        };

        let Some(version) = non_empty(&self.version).or_else(|| non_empty(&config.version)) else {
            config_bail!("version is not set");
        };

        let package_name = non_empty(&config.package_name).unwrap_or_else(|| {
            pkg_id
                .strip_suffix(".pkg")
                .unwrap_or(&pkg_id)
                .to_string()
        });

        let install_location = non_empty(&config.pkg_install_to)
            .unwrap_or_else(|| DEFAULT_INSTALL_LOCATION.to_string());

        let staging_dir = self
            .staging_dir
            .or_else(|| config.staging_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STAGING_DIR));

        let apps = config
            .pkg_apps
            .iter()
            .map(AppEntry::resolve)
            .collect::<Result<Vec<_>>>()?;
        let files = config
            .pkg_files
            .iter()
            .map(FileEntry::resolve)
            .collect::<Result<Vec<_>>>()?;
        let resources = match &config.pkg_resources {
            Some(spec) => spec.resolve()?,
            None => Vec::new(),
        };

        let signing = SigningSettings {
            app_patterns: config.sign_apps.clone(),
            tool_patterns: config.sign_tools.clone(),
            app_identity: non_empty(&config.sign_id_app),
            installer_identity: non_empty(&config.sign_id_installer),
            entitlements: config.sign_entitlements.clone(),
            keychain: non_empty(&config.sign_keychain),
            disabled: config.sign_disable || self.sign_disable,
        };

        let has_patterns = !signing.app_patterns.is_empty() || !signing.tool_patterns.is_empty();
        if has_patterns && !signing.disabled && signing.app_identity.is_none() {
            config_bail!("sign_apps or sign_tools is set but sign_id_app is not");
        }

        let mut notarize = config.notarize_settings();
        notarize.skip_notarization |= self.skip_notarization;

        let text_values = text_values(&config, &pkg_id, &version, &package_name, &install_location);

        Ok(Settings {
            pkg_id,
            version,
            package_name,
            install_location,
            staging_dir,
            apps,
            files,
            resources,
            scripts: config.pkg_scripts,
            component_plist: config.pkg_plist,
            distribution_template: config.pkg_distribution,
            signing,
            notarize,
            tools: config.tools,
            text_values,
        })
    }
}

/// Every text-valued option, keyed by its configuration name.
///
/// Resolved values replace what was written (`pkg_id`, `version`,
/// `package_name`, `pkg_install_to`). Non-string extra keys are left out.
fn text_values(
    config: &PkgConfig,
    pkg_id: &str,
    version: &str,
    package_name: &str,
    install_location: &str,
) -> BTreeMap<String, String> {
    let mut values: BTreeMap<String, String> = config
        .extra
        .iter()
        .filter_map(|(key, value)| value.as_str().map(|s| (key.clone(), s.to_string())))
        .collect();

    let mut insert = |key: &str, value: Option<String>| {
        if let Some(value) = value {
            values.insert(key.to_string(), value);
        }
    };
    let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.to_string_lossy().into_owned());

    insert("app_id", non_empty(&config.app_id));
    insert("pkg_id", Some(pkg_id.to_string()));
    insert("version", Some(version.to_string()));
    insert("package_name", Some(package_name.to_string()));
    insert("pkg_install_to", Some(install_location.to_string()));
    insert("pkg_scripts", path(&config.pkg_scripts));
    insert("pkg_plist", path(&config.pkg_plist));
    insert("pkg_distribution", path(&config.pkg_distribution));
    insert("sign_id_app", non_empty(&config.sign_id_app));
    insert("sign_id_installer", non_empty(&config.sign_id_installer));
    insert("sign_entitlements", path(&config.sign_entitlements));
    insert("sign_keychain", non_empty(&config.sign_keychain));
    insert("notarize_profile", non_empty(&config.notarize_profile));

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(app_id: Option<&str>, pkg_id: Option<&str>, version: Option<&str>) -> PkgConfig {
        PkgConfig {
            app_id: app_id.map(Into::into),
            pkg_id: pkg_id.map(Into::into),
            version: version.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn test_pkg_id_derived_from_app_id() {
        let settings = SettingsBuilder::new()
            .config(config(Some("ai.kodegen.app"), None, Some("1.0")))
            .build()
            .unwrap();
        assert_eq!(settings.pkg_id(), "ai.kodegen.app.pkg");
        assert_eq!(settings.package_name(), "ai.kodegen.app");
    }

    #[test]
    fn test_explicit_pkg_id_wins() {
        let settings = SettingsBuilder::new()
            .config(config(Some("ai.kodegen.app"), Some("ai.kodegen.installer"), Some("1.0")))
            .build()
            .unwrap();
        assert_eq!(settings.pkg_id(), "ai.kodegen.installer");
    }

    #[test]
    fn test_missing_identifier_is_config_error() {
        let err = SettingsBuilder::new()
            .config(config(None, None, Some("1.0")))
            .build()
            .unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("neither pkg_id nor app_id"));
    }

    #[test]
    fn test_missing_or_empty_version_is_config_error() {
        for version in [None, Some(""), Some("   ")] {
            let err = SettingsBuilder::new()
                .config(config(Some("a.b"), None, version))
                .build()
                .unwrap_err();
            assert!(err.is_config(), "{version:?}");
            assert!(err.to_string().contains("version is not set"));
        }
    }

    #[test]
    fn test_version_override() {
        let settings = SettingsBuilder::new()
            .config(config(Some("a.b"), None, None))
            .version("3.1.4")
            .build()
            .unwrap();
        assert_eq!(settings.version_string(), "3.1.4");
        assert_eq!(settings.template_values()["version"], "3.1.4");
    }

    #[test]
    fn test_defaults() {
        let settings = SettingsBuilder::new()
            .config(config(Some("a.b"), None, Some("1")))
            .build()
            .unwrap();
        assert_eq!(settings.install_location(), "/");
        assert_eq!(settings.staging_dir(), Path::new("build/pkg"));
        assert!(settings.distribution_template().is_none());
        assert_eq!(settings.tools().pkgbuild, "pkgbuild");
    }

    #[test]
    fn test_sign_patterns_require_identity() {
        let mut cfg = config(Some("a.b"), None, Some("1"));
        cfg.sign_apps = vec!["Applications/*.app".into()];
        let err = SettingsBuilder::new().config(cfg.clone()).build().unwrap_err();
        assert!(err.is_config());

        let settings = SettingsBuilder::new()
            .config(cfg)
            .sign_disable(true)
            .build()
            .unwrap();
        assert!(settings.signing().disabled);
        assert!(settings.signing().app_identity().is_none());
    }

    #[test]
    fn test_installer_identity_respects_disable() {
        let mut cfg = config(Some("a.b"), None, Some("1"));
        cfg.sign_id_installer = Some("Developer ID Installer: X".into());
        let enabled = SettingsBuilder::new().config(cfg.clone()).build().unwrap();
        assert_eq!(
            enabled.signing().installer_identity(),
            Some("Developer ID Installer: X")
        );

        cfg.sign_disable = true;
        let disabled = SettingsBuilder::new().config(cfg).build().unwrap();
        assert_eq!(disabled.signing().installer_identity(), None);
    }

    #[test]
    fn test_template_values_are_escaped_text_only() {
        let mut cfg = config(Some("a.b"), None, Some("1"));
        cfg.extra
            .insert("display_name".into(), toml::Value::String("Tom & \"Jerry\"".into()));
        cfg.extra.insert("build_number".into(), toml::Value::Integer(7));

        let values = SettingsBuilder::new().config(cfg).build().unwrap().template_values();
        assert_eq!(values["display_name"], "Tom &amp; &quot;Jerry&quot;");
        assert_eq!(values["pkg_id"], "a.b.pkg");
        assert!(!values.contains_key("build_number"));
        assert!(!values.contains_key("sign_keychain"));
    }
}
