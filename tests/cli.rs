#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn cmd() -> Command {
        let mut cmd = Command::cargo_bin("kodegen_bundler_pkg").unwrap();
        cmd.env_remove("KODEGEN_PKG_CONFIG");
        cmd
    }

    #[test]
    fn test_help_lists_overrides() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--pkg-version"))
            .stdout(predicate::str::contains("--skip-notarization"));
    }

    #[test]
    fn test_missing_version_exits_with_error() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("pkg.toml");
        std::fs::write(&config, "app_id = \"ai.kodegen.app\"\n").unwrap();

        cmd()
            .current_dir(temp.path())
            .args(["--config", "pkg.toml", "--output", "dist/Kodegen.pkg"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("version is not set"));

        assert!(!temp.path().join("build").exists());
        assert!(!temp.path().join("dist").exists());
    }

    #[test]
    fn test_missing_config_names_path() {
        let temp = TempDir::new().unwrap();
        cmd()
            .current_dir(temp.path())
            .args(["--config", "absent.toml", "--output", "Kodegen.pkg"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("absent.toml"));
    }

    #[test]
    fn test_rejects_non_pkg_output() {
        cmd()
            .args(["--output", "Kodegen.dmg"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains(".pkg"));
    }

    /// Drives the real process runner with stand-in packaging tools.
    #[cfg(unix)]
    #[test]
    fn test_end_to_end_with_stub_tools() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let tools = temp.path().join("tools");
        std::fs::create_dir_all(&tools).unwrap();
        for tool in ["pkgbuild", "productbuild"] {
            let path = tools.join(tool);
            std::fs::write(
                &path,
                "#!/bin/sh\nfor last; do :; done\nprintf 'pkg' > \"$last\"\n",
            )
            .unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let app = temp.path().join("Kodegen.app/Contents/MacOS");
        std::fs::create_dir_all(&app).unwrap();
        std::fs::write(app.join("Kodegen"), "binary").unwrap();

        std::fs::write(
            temp.path().join("pkg.toml"),
            format!(
                r#"
app_id = "ai.kodegen.app"
pkg_apps = ["Kodegen.app"]

[tools]
pkgbuild = "{pkgbuild}"
productbuild = "{productbuild}"
"#,
                pkgbuild = tools.join("pkgbuild").display(),
                productbuild = tools.join("productbuild").display(),
            ),
        )
        .unwrap();

        cmd()
            .current_dir(temp.path())
            .args([
                "--output",
                "dist/Kodegen.pkg",
                "--pkg-version",
                "1.0.0",
                "--sign-disable",
                "--skip-notarization",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("SHA256"));

        assert_eq!(
            std::fs::read_to_string(temp.path().join("dist/Kodegen.pkg")).unwrap(),
            "pkg"
        );
        assert!(
            temp.path()
                .join("build/pkg/root/Applications/Kodegen.app/Contents/MacOS/Kodegen")
                .is_file()
        );
        assert!(
            temp.path()
                .join("build/pkg/Packages/ai.kodegen.app.pkg")
                .is_file()
        );
    }
}
