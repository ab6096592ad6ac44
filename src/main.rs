//! Rollout - CI release orchestrator.
//!
//! Decides whether the current CI run publishes a tagged release, attaches
//! a rolling build, or does nothing, and exits 0 for every intentional
//! skip and non-zero for fatal failures.

use rollout::cli;
use rollout::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            let output = OutputManager::new(false);
            output.error(&format!("Fatal error: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    output.indent(&suggestion);
                }
            }

            process::exit(1);
        }
    }
}
