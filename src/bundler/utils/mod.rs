//! Shared helpers for staging files and running external tools.

pub mod command;
pub mod fs;
