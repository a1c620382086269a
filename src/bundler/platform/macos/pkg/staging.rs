//! Staging tree preparation.
//!
//! The staging directory mirrors the install filesystem:
//!
//! ```text
//! <staging>/
//! ├── root/          payload for pkgbuild --root
//! │   └── Applications/
//! ├── Packages/      component packages
//! ├── Resources/     installer resources
//! └── distribution.xml
//! ```

use crate::bundler::{
    error::{Context, ErrorExt, Result},
    settings::{AppInstall, FileInstall},
    utils::fs,
};
use std::io;
use std::path::{Path, PathBuf};

/// Paths of one staging tree.
#[derive(Clone, Debug)]
pub struct StagingLayout {
    /// Staging directory itself.
    pub base: PathBuf,
    /// Payload root.
    pub root: PathBuf,
    /// Component package output directory.
    pub packages: PathBuf,
    /// Installer resources directory.
    pub resources: PathBuf,
}

impl StagingLayout {
    /// Describes the layout under `base` without touching the filesystem.
    pub fn new(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
            root: base.join("root"),
            packages: base.join("Packages"),
            resources: base.join("Resources"),
        }
    }

    /// Removes any previous staging tree and creates an empty one.
    pub async fn prepare(&self) -> Result<()> {
        log::debug!("Cleaning staging directory: {}", self.base.display());
        fs::create_dir_all(&self.base, true).await?;

        for dir in [&self.root, &self.packages, &self.resources] {
            fs::create_dir_all(dir, false).await?;
        }
        Ok(())
    }

    /// Copies application bundles into `root/Applications`.
    ///
    /// Fails instead of merging when the destination bundle already exists.
    pub async fn install_apps(&self, apps: &[AppInstall]) -> Result<()> {
        let applications = self.root.join("Applications");
        for app in apps {
            let dest = applications.join(&app.name);
            if tokio::fs::symlink_metadata(&dest).await.is_ok() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "destination already exists",
                ))
                .fs_context("installing app bundle", dest);
            }
            log::info!("Installing {} -> {}", app.source.display(), dest.display());
            fs::copy_dir(&app.source, &dest)
                .await
                .with_context(|| format!("installing app bundle {}", app.source.display()))?;
        }
        Ok(())
    }

    /// Copies files and directories into `root`.
    pub async fn install_files(&self, files: &[FileInstall]) -> Result<()> {
        for file in files {
            let dest = self.root.join(&file.dest);
            log::info!("Installing {} -> {}", file.source.display(), dest.display());
            fs::copy_entry(&file.source, &dest)
                .await
                .with_context(|| format!("installing {}", file.source.display()))?;
        }
        Ok(())
    }

    /// Copies installer resources into `Resources`.
    ///
    /// Directory sources merge into `Resources/<dest>`. A file source lands
    /// at `Resources/<dest>`, or keeps its basename when `dest` is `.` or an
    /// existing directory.
    pub async fn install_resources(&self, resources: &[FileInstall]) -> Result<()> {
        for resource in resources {
            let dest_dir = self.resources.join(&resource.dest);

            let into_dir = resource.dest == Path::new(".") || dest_dir.is_dir();
            let dest = match resource.source.file_name() {
                Some(name) if into_dir && !resource.source.is_dir() => dest_dir.join(name),
                _ => dest_dir,
            };

            log::debug!("Resource {} -> {}", resource.source.display(), dest.display());
            fs::copy_entry(&resource.source, &dest)
                .await
                .with_context(|| format!("installing resource {}", resource.source.display()))?;
        }
        Ok(())
    }
}
