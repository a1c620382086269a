//! macOS code signing and notarization.
//!
//! Staged bundles and executables are signed with `codesign` using the
//! hardened runtime. The finished installer is submitted with
//! `xcrun notarytool`, and the ticket is stapled with `xcrun stapler`.

use crate::bundler::{
    builder::signing::NotarizationAuth,
    error::{Error, Result},
    settings::Settings,
    utils::command::{CommandRunner, ToolCommand},
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound on waiting for a notarization verdict.
pub const NOTARIZATION_TIMEOUT: Duration = Duration::from_secs(1200);

/// What a signed path is, which decides the `codesign` flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignTarget {
    /// Application bundle; receives entitlements when configured.
    Application,
    /// Standalone executable.
    Executable,
}

/// Builds the `codesign` invocation for one path.
pub fn codesign_command(
    settings: &Settings,
    identity: &str,
    path: &Path,
    kind: SignTarget,
) -> ToolCommand {
    let signing = settings.signing();

    let mut cmd = ToolCommand::new(&settings.tools().codesign);
    cmd.args(["--force", "--timestamp", "--options", "runtime"])
        .arg("--sign")
        .arg(identity);

    if let Some(keychain) = &signing.keychain {
        cmd.arg("--keychain").arg(keychain);
    }
    if kind == SignTarget::Application {
        if let Some(entitlements) = &signing.entitlements {
            cmd.arg("--entitlements").arg(entitlements);
        }
    }

    cmd.arg(path);
    cmd
}

/// Expands glob `patterns` relative to `root`.
///
/// Wildcards never match hidden entries such as `.DS_Store`.
fn expand_patterns(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let base = glob::Pattern::escape(&root.to_string_lossy());
    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..Default::default()
    };
    let mut matches = Vec::new();

    for pattern in patterns {
        let full = format!("{}/{}", base, pattern.trim_start_matches('/'));
        let before = matches.len();
        for entry in glob::glob_with(&full, options)? {
            matches.push(entry?);
        }
        if matches.len() == before {
            log::warn!("Signing pattern '{}' matched nothing under {}", pattern, root.display());
        }
    }

    Ok(matches)
}

/// Signs the staged applications and executables selected by `sign_apps`
/// and `sign_tools`.
///
/// Applications are signed before executables. Does nothing, with an info
/// log, when signing is disabled.
pub async fn sign_staged<R: CommandRunner>(runner: &R, settings: &Settings, root: &Path) -> Result<()> {
    let signing = settings.signing();
    if signing.app_patterns.is_empty() && signing.tool_patterns.is_empty() {
        return Ok(());
    }

    let Some(identity) = signing.app_identity() else {
        log::info!("Signing disabled, skipping staged apps and tools");
        return Ok(());
    };

    for (patterns, kind) in [
        (&signing.app_patterns, SignTarget::Application),
        (&signing.tool_patterns, SignTarget::Executable),
    ] {
        for path in expand_patterns(root, patterns)? {
            log::info!("Signing {} with identity '{}'", path.display(), identity);
            runner
                .run(&codesign_command(settings, identity, &path, kind))
                .await?;
            log::info!("✓ Signed {}", path.display());
        }
    }

    Ok(())
}

/// The fields of `notarytool submit --output-format json` this crate reads.
#[derive(Debug, Deserialize)]
struct NotarySubmission {
    #[serde(default)]
    id: String,
    status: String,
    #[serde(default)]
    message: String,
}

/// Builds the `notarytool submit` invocation for `target`.
pub fn notarize_command(settings: &Settings, auth: &NotarizationAuth, target: &Path) -> ToolCommand {
    let mut cmd = ToolCommand::new(&settings.tools().xcrun);
    cmd.args(["notarytool", "submit"])
        .arg(target)
        .arg("--wait")
        .arg("--timeout")
        .arg(format!("{}s", NOTARIZATION_TIMEOUT.as_secs()))
        .args(["--output-format", "json"]);
    auth.append_args(&mut cmd);
    cmd.timeout(NOTARIZATION_TIMEOUT);
    cmd
}

/// Submits `target` for notarization, waits for the verdict and staples the
/// ticket.
///
/// # Errors
///
/// - [`Error::CommandTimeout`] if no verdict arrives within 1200 seconds
/// - [`Error::Notarization`] if the submission is not `Accepted`
/// - [`Error::CommandFailed`] if `notarytool` or `stapler` exit unsuccessfully
pub async fn notarize_and_staple<R: CommandRunner>(
    runner: &R,
    settings: &Settings,
    auth: &NotarizationAuth,
    target: &Path,
) -> Result<()> {
    log::info!("Notarizing {} (this may take several minutes)", target.display());

    let output = runner.run(&notarize_command(settings, auth, target)).await?;
    let submission: NotarySubmission = serde_json::from_str(output.stdout.trim())?;

    if submission.status != "Accepted" {
        return Err(Error::Notarization(format!(
            "submission {} finished with status '{}': {}",
            submission.id, submission.status, submission.message
        )));
    }
    log::info!("✓ Notarization accepted (submission {})", submission.id);

    if settings.notarize().skip_stapling {
        log::info!("Stapling disabled (skip_stapling = true)");
        return Ok(());
    }

    let mut staple = ToolCommand::new(&settings.tools().xcrun);
    staple.args(["stapler", "staple"]).arg(target);
    runner.run(&staple).await?;
    log::info!("✓ Stapled notarization ticket to {}", target.display());

    Ok(())
}
