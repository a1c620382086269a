//! Final installer assembly with productbuild.

use super::staging::StagingLayout;
use crate::bundler::{
    error::Result,
    settings::Settings,
    utils::command::{CommandRunner, ToolCommand},
};
use std::path::{Path, PathBuf};

/// What productbuild assembles the installer from.
#[derive(Clone, Debug)]
pub enum ProductSource {
    /// A rendered distribution manifest plus the component package directory.
    Distribution {
        /// `distribution.xml`
        manifest: PathBuf,
        /// Directory searched for the packages the manifest references.
        package_path: PathBuf,
    },
    /// A single component package, no manifest.
    Component(PathBuf),
}

impl ProductSource {
    /// Chooses the manifest when one was rendered, else the component package.
    pub fn select(manifest: Option<PathBuf>, component: PathBuf, layout: &StagingLayout) -> Self {
        match manifest {
            Some(manifest) => Self::Distribution {
                manifest,
                package_path: layout.packages.clone(),
            },
            None => Self::Component(component),
        }
    }
}

/// Builds the `productbuild` invocation writing `target`.
pub fn productbuild_command(
    settings: &Settings,
    source: &ProductSource,
    layout: &StagingLayout,
    target: &Path,
) -> ToolCommand {
    let mut cmd = ToolCommand::new(&settings.tools().productbuild);
    cmd.arg("--version").arg(settings.version_string());

    match source {
        ProductSource::Distribution {
            manifest,
            package_path,
        } => {
            cmd.arg("--distribution")
                .arg(manifest)
                .arg("--package-path")
                .arg(package_path);
        }
        ProductSource::Component(component) => {
            cmd.arg("--package").arg(component);
        }
    }

    cmd.arg("--resources").arg(&layout.resources);

    let signing = settings.signing();
    if let Some(identity) = signing.installer_identity() {
        cmd.arg("--sign").arg(identity).arg("--timestamp");
        if let Some(keychain) = &signing.keychain {
            cmd.arg("--keychain").arg(keychain);
        }
    }

    cmd.arg(target);
    cmd
}

/// Runs `productbuild`, writing the final installer to `target`.
pub async fn build_product<R: CommandRunner>(
    runner: &R,
    settings: &Settings,
    source: &ProductSource,
    layout: &StagingLayout,
    target: &Path,
) -> Result<()> {
    if let ProductSource::Component(_) = source {
        log::warn!("No distribution specified, using --package");
    }

    let cmd = productbuild_command(settings, source, layout, target);
    log::info!("Building installer {}", target.display());
    runner.run(&cmd).await?;
    Ok(())
}
