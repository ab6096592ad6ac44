//! # Rollout
//!
//! CI release orchestrator: decides from the state of a CI run (branch,
//! tag, commit message) whether a build artifact is published as a formal
//! release, attached to the rolling "builds" release, or left unpublished,
//! then manages release records and assets on the remote host and posts
//! announcements to the issues the commit references.
//!
//! ## Behavior
//!
//! - **Tagged releases**: `v{version}` tag on `master`, duplicate-checked,
//!   primary artifact uploaded, legacy pointer asset refreshed.
//! - **Rolling builds**: untagged commits referencing issues attach their
//!   artifact to a fixed release; assets older than a week are expired.
//! - **Dry run**: outside a recognized CI service every remote mutation is
//!   replaced by a log line; the decision path is unchanged.
//! - **Announcements**: one comment per referenced issue, best-effort.
//!
//! ## Usage
//!
//! ```bash
//! rollout                       # decide and publish from CI state
//! rollout "Release notes text"  # supply the release body for tag builds
//! rollout --artifact dist/pkg.xpi
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod announce;
pub mod assets;
pub mod ci;
pub mod classify;
pub mod cli;
pub mod error;
pub mod extract;
pub mod metadata;
pub mod orchestrator;
pub mod store;

// Re-export main types for public API
pub use announce::{Announcement, Announcer};
pub use assets::AssetManager;
pub use ci::CiContext;
pub use classify::RunIntent;
pub use cli::Args;
pub use error::{ReleaseError, Result};
pub use extract::Extraction;
pub use metadata::PackageMetadata;
pub use orchestrator::RunOutcome;
pub use store::{AssetRecord, DryRunStore, GitHubStore, ReleaseRecord, ReleaseStore};

use std::path::PathBuf;

/// Configuration for a release run
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    /// Repository slug, `owner/name`
    pub repo_slug: String,
    /// Nightly flag: suppress releasing entirely for scheduled runs
    pub nightly: bool,
    /// Tag of the fixed rolling-builds release
    pub rolling_tag: String,
    /// Branch carrying localization work
    pub localization_branch: String,
    /// Tracker label whose open issues receive rolling-build announcements
    pub translation_label: String,
    /// Fixed name of the legacy pointer asset
    pub legacy_asset_name: String,
    /// Body text for tagged releases
    pub release_body: String,
    /// Path to the built artifact
    pub artifact: PathBuf,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            repo_slug: String::new(),
            nightly: false,
            rolling_tag: "builds".to_string(),
            localization_branch: "l10n".to_string(),
            translation_label: "translation".to_string(),
            legacy_asset_name: "update.json".to_string(),
            release_body: String::new(),
            artifact: PathBuf::new(),
        }
    }
}
