//! Component package creation with pkgbuild.

use super::staging::StagingLayout;
use crate::bundler::{
    error::Result,
    settings::Settings,
    utils::command::{CommandRunner, ToolCommand},
};
use std::path::PathBuf;

/// Builds the `pkgbuild` invocation for the staged payload.
///
/// Returns the command together with the component package path it writes.
pub fn pkgbuild_command(settings: &Settings, layout: &StagingLayout) -> (ToolCommand, PathBuf) {
    let component = layout
        .packages
        .join(format!("{}.pkg", settings.package_name()));

    let mut cmd = ToolCommand::new(&settings.tools().pkgbuild);
    cmd.arg("--root")
        .arg(&layout.root)
        .arg("--id")
        .arg(settings.pkg_id())
        .arg("--version")
        .arg(settings.version_string())
        .arg("--install-location")
        .arg(settings.install_location());

    if let Some(scripts) = settings.scripts() {
        cmd.arg("--scripts").arg(scripts);
    }
    if let Some(plist) = settings.component_plist() {
        cmd.arg("--component-plist").arg(plist);
    }

    cmd.arg(&component);
    (cmd, component)
}

/// Runs `pkgbuild` and returns the component package path.
pub async fn build_component<R: CommandRunner>(
    runner: &R,
    settings: &Settings,
    layout: &StagingLayout,
) -> Result<PathBuf> {
    let (cmd, component) = pkgbuild_command(settings, layout);
    log::info!("Building component package {}", component.display());
    runner.run(&cmd).await?;
    Ok(component)
}
