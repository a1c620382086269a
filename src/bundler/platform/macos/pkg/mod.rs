//! Flat installer package (.pkg) creation.
//!
//! Builds an installer in the order the packaging tools require:
//! 1. Rebuild the staging tree and copy apps, files and resources into it
//! 2. Sign staged applications, then staged executables
//! 3. Build the component package with `pkgbuild`
//! 4. Render the distribution manifest, if a template is configured
//! 5. Assemble (and optionally sign) the installer with `productbuild`
//! 6. Notarize and staple the installer

mod component;
mod distribution;
mod product;
mod staging;

pub use component::{build_component, pkgbuild_command};
pub use distribution::{render_template, write_manifest, xml_escape};
pub use product::{ProductSource, build_product, productbuild_command};
pub use staging::StagingLayout;

use super::sign;
use crate::bundler::{
    builder::signing::NotarizationAuth,
    error::{ErrorExt, NotarizeAuthError, Result},
    settings::Settings,
    utils::command::CommandRunner,
};
use std::path::{Path, PathBuf};

/// Builds the installer package at `target`.
///
/// `auth` is only consulted when notarization is enabled; passing `None`
/// then fails after the installer has been built.
pub async fn bundle_project<R: CommandRunner>(
    runner: &R,
    settings: &Settings,
    auth: Option<&NotarizationAuth>,
    target: &Path,
) -> Result<PathBuf> {
    let layout = StagingLayout::new(settings.staging_dir());
    layout.prepare().await?;

    layout.install_apps(settings.apps()).await?;
    layout.install_files(settings.files()).await?;
    layout.install_resources(settings.resources()).await?;

    sign::sign_staged(runner, settings, &layout.root).await?;

    let component = build_component(runner, settings, &layout).await?;

    let manifest = write_manifest(settings, &layout.base).await?;
    let source = ProductSource::select(manifest, component, &layout);

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating output directory", parent)?;
    }

    build_product(runner, settings, &source, &layout, target).await?;

    if settings.notarize().skip_notarization {
        log::info!("Notarization disabled (skip_notarization = true)");
    } else {
        let auth = auth.ok_or(NotarizeAuthError::Credentials)?;
        sign::notarize_and_staple(runner, settings, auth, target).await?;
    }

    Ok(target.to_path_buf())
}
