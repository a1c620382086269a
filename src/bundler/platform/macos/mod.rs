//! macOS installer packaging.

pub mod pkg;
pub mod sign;
