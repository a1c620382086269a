//! Kodegen Bundler Pkg - signed, notarized macOS installer packages.
//!
//! This binary stages app bundles into a flat installer package (.pkg) with
//! pkgbuild and productbuild, then notarizes and staples it.

use kodegen_bundler_pkg::cli;
use kodegen_bundler_pkg::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // Never quiet for fatal errors
            let output = OutputManager::new(false, false);
            output.error(&format!("Fatal error: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                output.indent_err("");
                output.indent_err("💡 Recovery suggestions:");
                for suggestion in suggestions {
                    output.indent_err(&format!("  {suggestion}"));
                }
            }

            process::exit(1);
        }
    }
}
