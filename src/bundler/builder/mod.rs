//! Package build orchestration and coordination.
//!
//! This module provides the [`PackageBuilder`] orchestrator that drives one
//! installer build from validated [`Settings`](crate::bundler::Settings) to
//! a [`PackageArtifact`](crate::bundler::PackageArtifact).
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`orchestrator`] - Main [`PackageBuilder`] struct
//! - [`signing`] - Notarization credential resolution
//! - [`tool_detection`] - External tool availability checking

pub mod checksum;
mod orchestrator;
pub mod signing;
pub mod tool_detection;

pub use orchestrator::PackageBuilder;
pub use signing::NotarizationAuth;
