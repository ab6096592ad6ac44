//! Command line argument parsing.
//!
//! The tool is designed to run unattended on CI with zero required
//! arguments; everything it needs comes from the environment and the
//! package manifest.

use std::path::PathBuf;

use clap::Parser;

/// Release orchestrator for CI runs
#[derive(Parser, Debug)]
#[command(
    name = "rollout",
    version,
    about = "Publish CI build artifacts as releases or rolling builds",
    long_about = "Decides from the CI run state (branch, tag, commit message) whether \
the build artifact becomes a formal release, is attached to the rolling \
'builds' release, or is left unpublished. Outside CI it performs a dry run: \
every remote mutation is replaced by a log line."
)]
pub struct Args {
    /// Release body text for tagged releases
    #[arg(index = 1, value_name = "RELEASE_BODY", default_value = "")]
    pub release_body: String,

    /// Path to the built artifact (default: build/{name}-{version}.xpi)
    #[arg(long, value_name = "PATH")]
    pub artifact: Option<PathBuf>,

    /// Path to the package manifest
    #[arg(long, value_name = "PATH", default_value = "Cargo.toml")]
    pub manifest: PathBuf,

    /// Suppress non-error output
    #[arg(long, short)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
