//! macOS signing, notarization and tool settings.

use std::path::PathBuf;

/// Code signing configuration for staged content and the final installer.
///
/// # Configuration
///
/// ```toml
/// sign_apps = ["Applications/*.app"]
/// sign_tools = ["usr/local/bin/*"]
/// sign_id_app = "Developer ID Application: Your Name (TEAMID)"
/// sign_id_installer = "Developer ID Installer: Your Name (TEAMID)"
/// sign_keychain = "build.keychain"
/// ```
#[derive(Clone, Debug, Default)]
pub struct SigningSettings {
    /// Glob patterns of application bundles, relative to the staged root.
    pub app_patterns: Vec<String>,

    /// Glob patterns of standalone executables, relative to the staged root.
    pub tool_patterns: Vec<String>,

    /// Identity used by `codesign`.
    pub app_identity: Option<String>,

    /// Identity used by `productbuild --sign`.
    pub installer_identity: Option<String>,

    /// Entitlements applied to application bundles.
    pub entitlements: Option<PathBuf>,

    /// Keychain passed to both `codesign` and `productbuild`.
    pub keychain: Option<String>,

    /// Disables all signing.
    ///
    /// Default: false
    pub disabled: bool,
}

impl SigningSettings {
    /// Identity for the installer, if installer signing is enabled.
    pub fn installer_identity(&self) -> Option<&str> {
        if self.disabled {
            return None;
        }
        self.installer_identity.as_deref()
    }

    /// Identity for staged apps and executables, if signing is enabled.
    pub fn app_identity(&self) -> Option<&str> {
        if self.disabled {
            return None;
        }
        self.app_identity.as_deref()
    }
}

/// Notarization configuration for the final installer.
#[derive(Clone, Debug, Default)]
pub struct NotarizeSettings {
    /// Skip notarization entirely.
    ///
    /// Notarization is required for distribution outside the Mac App Store.
    /// Only skip for development/testing.
    ///
    /// Default: false (notarization enabled)
    pub skip_notarization: bool,

    /// Skip stapling the notarization ticket.
    ///
    /// Default: false (stapling enabled)
    pub skip_stapling: bool,

    /// Keychain profile stored with `notarytool store-credentials`.
    ///
    /// Takes precedence over credentials in the environment.
    pub profile: Option<String>,
}

/// External tool names or paths.
///
/// # Configuration
///
/// ```toml
/// [tools]
/// pkgbuild = "/usr/bin/pkgbuild"
/// ```
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Component package builder.
    pub pkgbuild: String,
    /// Distribution package builder.
    pub productbuild: String,
    /// Code signing tool.
    pub codesign: String,
    /// Developer tool launcher used for `notarytool` and `stapler`.
    pub xcrun: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            pkgbuild: "pkgbuild".into(),
            productbuild: "productbuild".into(),
            codesign: "codesign".into(),
            xcrun: "xcrun".into(),
        }
    }
}
