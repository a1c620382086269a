//! Package configuration loading from TOML.
//!
//! The configuration is either a standalone file whose top level is the
//! package configuration, or a `Cargo.toml` carrying it under
//! `[package.metadata.pkg]`. In the latter case `version` and
//! `package_name` fall back to `[package].version` and `[package].name`.

use crate::bundler::PkgConfig;
use crate::error::{BundlerError, CliError, Result};
use std::path::Path;
use toml::{Table, Value};

/// Reads and parses the package configuration at `path`.
pub fn load_config(path: &Path) -> Result<PkgConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "read_config".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;

    parse_config(&content).map_err(|e| match e {
        BundlerError::Toml(e) => BundlerError::Cli(CliError::ExecutionFailed {
            command: "parse_config".to_string(),
            reason: format!("Failed to parse {}: {}", path.display(), e),
        }),
        other => other,
    })
}

/// Parses package configuration from TOML text.
pub fn parse_config(content: &str) -> Result<PkgConfig> {
    let document: Table = toml::from_str(content)?;

    let table = embedded_config(&document).unwrap_or(document);
    let config: PkgConfig = Value::Table(table).try_into()?;
    Ok(config)
}

/// `[package.metadata.pkg]` with defaults taken from `[package]`.
fn embedded_config(document: &Table) -> Option<Table> {
    let package = document.get("package")?.as_table()?;
    let mut table = package
        .get("metadata")?
        .get("pkg")?
        .as_table()?
        .clone();

    for (key, from) in [("version", "version"), ("package_name", "name")] {
        if table.contains_key(key) {
            continue;
        }
        // `version.workspace = true` is a table, not a usable default
        if let Some(value) = package.get(from).and_then(Value::as_str) {
            table.insert(key.to_string(), Value::String(value.to_string()));
        }
    }

    Some(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::AppEntry;

    #[test]
    fn test_standalone_config() {
        let config = parse_config(
            r#"
            app_id = "ai.kodegen.app"
            version = "2.0.0"
            pkg_apps = [["build/Kodegen.app", "Kodegen.app"]]

            [tools]
            pkgbuild = "/usr/bin/pkgbuild"
            "#,
        )
        .unwrap();

        assert_eq!(config.app_id.as_deref(), Some("ai.kodegen.app"));
        assert_eq!(config.version.as_deref(), Some("2.0.0"));
        assert!(matches!(config.pkg_apps[0], AppEntry::Mapped(_)));
        assert_eq!(config.tools.pkgbuild, "/usr/bin/pkgbuild");
        assert_eq!(config.tools.productbuild, "productbuild");
    }

    #[test]
    fn test_cargo_metadata_inherits_package_fields() {
        let config = parse_config(
            r#"
            [package]
            name = "kodegen"
            version = "0.3.1"

            [package.metadata.pkg]
            app_id = "ai.kodegen.app"
            "#,
        )
        .unwrap();

        assert_eq!(config.version.as_deref(), Some("0.3.1"));
        assert_eq!(config.package_name.as_deref(), Some("kodegen"));
        // The rest of Cargo.toml is not configuration
        assert!(!config.extra.contains_key("package"));
    }

    #[test]
    fn test_cargo_metadata_keeps_explicit_version() {
        let config = parse_config(
            r#"
            [package]
            name = "kodegen"
            version = "0.3.1"

            [package.metadata.pkg]
            version = "1.0.0"
            "#,
        )
        .unwrap();
        assert_eq!(config.version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_load_reports_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("pkg.toml");
        std::fs::write(&path, "version = [").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("pkg.toml"));

        let err = load_config(&temp.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }
}
