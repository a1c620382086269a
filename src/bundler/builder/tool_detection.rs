//! External tool detection and availability checking.
//!
//! Tools are looked up on `PATH` right before they run so a missing
//! `pkgbuild` or `xcrun` is reported by name instead of as a spawn error.

use crate::bundler::{Error, Result};
use std::path::PathBuf;
use std::sync::LazyLock;

/// Whether the Xcode developer tools (`xcrun`) are available.
///
/// Cached result to avoid repeated lookups; used to warn early on hosts that
/// cannot notarize.
pub static HAS_XCRUN: LazyLock<bool> = LazyLock::new(|| match which::which("xcrun") {
    Ok(path) => {
        log::debug!("Found xcrun at: {}", path.display());
        true
    }
    Err(e) => {
        log::debug!("xcrun not found in PATH: {}", e);
        false
    }
});

/// Resolves a configured tool name or path to an executable.
///
/// Absolute and relative paths are checked as given; bare names are
/// searched on `PATH`.
pub fn resolve_tool(tool: &str) -> Result<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::trace!("Resolved {} to {}", tool, path.display());
            Ok(path)
        }
        Err(error) => Err(Error::ToolNotFound {
            tool: tool.to_string(),
            error,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_is_named_in_error() {
        let err = resolve_tool("kodegen-no-such-packaging-tool").unwrap_err();
        assert!(err.to_string().starts_with("kodegen-no-such-packaging-tool not found"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolves_shell() {
        assert!(resolve_tool("sh").is_ok());
    }
}
