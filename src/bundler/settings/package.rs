//! Package configuration as written by the user, and the staging entries it
//! resolves to.

use super::{NotarizeSettings, ToolSettings};
use crate::config_bail;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Raw installer package configuration.
///
/// Deserialized from a standalone `pkg.toml` or from
/// `[package.metadata.pkg]` in `Cargo.toml`. Every field is optional here;
/// [`SettingsBuilder`](super::SettingsBuilder) resolves defaults and rejects
/// incomplete configurations.
///
/// # Configuration
///
/// ```toml
/// app_id = "ai.kodegen.app"
/// version = "1.4.0"
/// package_name = "Kodegen"
/// pkg_install_to = "/"
/// pkg_apps = [["target/bundle/Kodegen.app", "Kodegen.app"]]
/// pkg_resources = "installer/resources"
/// pkg_distribution = "installer/distribution.xml"
/// sign_apps = ["Applications/*.app"]
/// sign_id_app = "Developer ID Application: Example (TEAMID)"
/// sign_id_installer = "Developer ID Installer: Example (TEAMID)"
///
/// # Any other string key is available to the distribution template
/// display_name = "Kodegen & Friends"
/// ```
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct PkgConfig {
    /// Application identifier; `pkg_id` defaults to `<app_id>.pkg`.
    pub app_id: Option<String>,

    /// Component package identifier.
    pub pkg_id: Option<String>,

    /// Package version. Required.
    pub version: Option<String>,

    /// Base name of the component package file.
    ///
    /// Default: the resolved package identifier without its `.pkg` suffix
    pub package_name: Option<String>,

    /// Install location passed to `pkgbuild`.
    ///
    /// Default: `/`
    pub pkg_install_to: Option<String>,

    /// Application bundles staged under `root/Applications`.
    pub pkg_apps: Vec<AppEntry>,

    /// Other files staged under `root`.
    pub pkg_files: Vec<FileEntry>,

    /// Installer resources (background images, license, readme).
    pub pkg_resources: Option<ResourceSpec>,

    /// Directory of preinstall/postinstall scripts.
    pub pkg_scripts: Option<PathBuf>,

    /// Component property list passed to `pkgbuild --component-plist`.
    pub pkg_plist: Option<PathBuf>,

    /// Distribution manifest template with `%(key)s` placeholders.
    pub pkg_distribution: Option<PathBuf>,

    /// Glob patterns, relative to the staged root, of bundles to sign.
    pub sign_apps: Vec<String>,

    /// Glob patterns, relative to the staged root, of executables to sign.
    pub sign_tools: Vec<String>,

    /// `codesign` identity for applications and executables.
    pub sign_id_app: Option<String>,

    /// `productbuild` identity for the final installer.
    pub sign_id_installer: Option<String>,

    /// Entitlements plist applied when signing applications.
    pub sign_entitlements: Option<PathBuf>,

    /// Keychain holding the signing identities.
    pub sign_keychain: Option<String>,

    /// Disable every signing step.
    pub sign_disable: bool,

    /// Skip notarization of the final package.
    pub skip_notarization: bool,

    /// Skip stapling the notarization ticket.
    pub skip_stapling: bool,

    /// Stored `notarytool` keychain profile.
    pub notarize_profile: Option<String>,

    /// Staging directory.
    ///
    /// Default: `build/pkg`
    pub staging_dir: Option<PathBuf>,

    /// External tool overrides.
    pub tools: ToolSettings,

    /// Every other key. String values feed the distribution template.
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl PkgConfig {
    /// Notarization settings carried by this configuration.
    pub fn notarize_settings(&self) -> NotarizeSettings {
        NotarizeSettings {
            skip_notarization: self.skip_notarization,
            skip_stapling: self.skip_stapling,
            profile: non_empty(&self.notarize_profile),
        }
    }
}

/// One `pkg_apps` entry: a bare bundle path, or `[source, dest-name]` with an
/// optional trailing element that is ignored.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(untagged)]
pub enum AppEntry {
    /// Staged under its own basename.
    Path(PathBuf),
    /// Staged under the second element.
    Mapped(Vec<String>),
}

/// One `pkg_files` entry: a bare path, or `[source, dest]`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(untagged)]
pub enum FileEntry {
    /// Staged at `root/<basename>`.
    Path(PathBuf),
    /// Staged at `root/<dest>`.
    Mapped(Vec<String>),
}

/// `pkg_resources`: a single path, or a list of `[path, dest]` pairs.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(untagged)]
pub enum ResourceSpec {
    /// Normalized to `[[path, "."]]`.
    Single(PathBuf),
    /// Copied pairwise into the resources directory.
    List(Vec<Vec<String>>),
}

/// An application bundle to copy into `root/Applications`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppInstall {
    /// Source bundle directory.
    pub source: PathBuf,
    /// Name under `Applications/`.
    pub name: PathBuf,
}

/// A file or directory to copy into the staged root or resources directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInstall {
    /// Source file or directory.
    pub source: PathBuf,
    /// Destination, relative to the staging subdirectory.
    pub dest: PathBuf,
}

impl AppEntry {
    pub(super) fn resolve(&self) -> crate::bundler::Result<AppInstall> {
        match self {
            AppEntry::Path(source) => Ok(AppInstall {
                name: basename(source)?,
                source: source.clone(),
            }),
            AppEntry::Mapped(parts) if (2..=3).contains(&parts.len()) => {
                let name = relative(&parts[1]);
                if name == Path::new(".") {
                    config_bail!("pkg_apps entry {:?} has an empty destination name", parts);
                }
                Ok(AppInstall {
                    source: PathBuf::from(&parts[0]),
                    name,
                })
            }
            AppEntry::Mapped(parts) => config_bail!(
                "pkg_apps entry {:?} must have 2 or 3 elements, found {}",
                parts,
                parts.len()
            ),
        }
    }
}

impl FileEntry {
    pub(super) fn resolve(&self) -> crate::bundler::Result<FileInstall> {
        match self {
            FileEntry::Path(source) => Ok(FileInstall {
                dest: basename(source)?,
                source: source.clone(),
            }),
            FileEntry::Mapped(parts) if parts.len() == 2 => Ok(FileInstall {
                source: PathBuf::from(&parts[0]),
                dest: relative(&parts[1]),
            }),
            FileEntry::Mapped(parts) => config_bail!(
                "pkg_files entry {:?} must be [source, dest], found {} elements",
                parts,
                parts.len()
            ),
        }
    }
}

impl ResourceSpec {
    pub(super) fn resolve(&self) -> crate::bundler::Result<Vec<FileInstall>> {
        match self {
            ResourceSpec::Single(source) => Ok(vec![FileInstall {
                source: source.clone(),
                dest: PathBuf::from("."),
            }]),
            ResourceSpec::List(pairs) => pairs
                .iter()
                .map(|pair| match pair.as_slice() {
                    [source, dest] => Ok(FileInstall {
                        source: PathBuf::from(source),
                        dest: relative(dest),
                    }),
                    _ => config_bail!(
                        "pkg_resources entry {:?} must be [path, dest], found {} elements",
                        pair,
                        pair.len()
                    ),
                })
                .collect(),
        }
    }
}

fn basename(source: &Path) -> crate::bundler::Result<PathBuf> {
    match source.file_name() {
        Some(name) => Ok(PathBuf::from(name)),
        None => config_bail!("{} has no file name", source.display()),
    }
}

/// Destinations are always inside the staging tree.
fn relative(dest: &str) -> PathBuf {
    let path: PathBuf = Path::new(dest)
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    if path.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        path
    }
}

pub(super) fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_entry_bare_path_uses_basename() {
        let entry = AppEntry::Path(PathBuf::from("build/out/Foo.app"));
        let install = entry.resolve().unwrap();
        assert_eq!(install.source, PathBuf::from("build/out/Foo.app"));
        assert_eq!(install.name, PathBuf::from("Foo.app"));
    }

    #[test]
    fn test_app_entry_pair_and_triple() {
        let pair = AppEntry::Mapped(vec!["SrcApp".into(), "Dest.app".into()]);
        assert_eq!(pair.resolve().unwrap().name, PathBuf::from("Dest.app"));

        let triple = AppEntry::Mapped(vec!["SrcApp".into(), "Dest.app".into(), "x".into()]);
        assert_eq!(triple.resolve().unwrap().name, PathBuf::from("Dest.app"));

        let single = AppEntry::Mapped(vec!["SrcApp".into()]);
        assert!(single.resolve().unwrap_err().is_config());
    }

    #[test]
    fn test_app_entry_rejects_empty_destination() {
        for dest in ["", "/", "."] {
            let entry = AppEntry::Mapped(vec!["SrcApp".into(), dest.into()]);
            let err = entry.resolve().unwrap_err();
            assert!(err.is_config(), "{dest:?}");
            assert!(err.to_string().contains("empty destination"));
        }
    }

    #[test]
    fn test_file_entry_strips_leading_slash() {
        let entry = FileEntry::Mapped(vec!["tool".into(), "/usr/local/bin/tool".into()]);
        assert_eq!(
            entry.resolve().unwrap().dest,
            PathBuf::from("usr/local/bin/tool")
        );
    }

    #[test]
    fn test_single_resource_normalized_to_current_dir() {
        let spec = ResourceSpec::Single(PathBuf::from("installer/resources"));
        let resolved = spec.resolve().unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].dest, PathBuf::from("."));
    }

    #[test]
    fn test_deserialize_mixed_entries() {
        let config: PkgConfig = toml::from_str(
            r#"
            version = "1.0"
            pkg_apps = ["a/One.app", ["b/Two.app", "Renamed.app"]]
            pkg_resources = [["license.txt", "."], ["bg", "images"]]
            display_name = "Friendly"
            build_number = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.pkg_apps.len(), 2);
        assert!(matches!(config.pkg_apps[0], AppEntry::Path(_)));
        assert!(matches!(config.pkg_apps[1], AppEntry::Mapped(_)));
        assert!(matches!(config.pkg_resources, Some(ResourceSpec::List(_))));
        assert_eq!(
            config.extra.get("display_name").and_then(|v| v.as_str()),
            Some("Friendly")
        );
        assert!(config.extra.contains_key("build_number"));
    }
}
