//! Configuration structures for installer package builds.
//!
//! This module provides the raw, deserializable [`PkgConfig`], the validated
//! [`Settings`] record consumed by the package builder, and the
//! [`SettingsBuilder`] that turns one into the other.

mod builder;
mod core;
mod macos;
mod package;

// Re-export all public types
pub use builder::SettingsBuilder;
pub use self::core::{DEFAULT_INSTALL_LOCATION, DEFAULT_STAGING_DIR, Settings};
pub use macos::{NotarizeSettings, SigningSettings, ToolSettings};
pub use package::{AppEntry, AppInstall, FileEntry, FileInstall, PkgConfig, ResourceSpec};
