//! Release store abstraction.
//!
//! The core never talks to the release host directly; it goes through
//! [`ReleaseStore`], implemented for real by [`GitHubStore`] and wrapped
//! by [`DryRunStore`] when no CI service is detected.

mod dry_run;
mod github;

pub use dry_run::DryRunStore;
pub use github::GitHubStore;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::Result;

/// A release record owned by the remote store
///
/// Obtained via lookup-by-tag or create, never constructed by the core
/// (the dry-run wrapper synthesizes placeholders for unexecuted creates).
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseRecord {
    /// Tag the release is published under
    pub tag_name: String,
    /// Store-assigned release id
    pub id: u64,
    /// Asset upload target (URI template on GitHub)
    pub upload_url: String,
    /// Human-facing release page URL
    pub html_url: String,
    /// Assets attached at fetch time
    #[serde(default)]
    pub assets: Vec<AssetRecord>,
}

/// A binary asset attached to a release
#[derive(Debug, Clone, Deserialize)]
pub struct AssetRecord {
    /// Store-assigned asset id
    pub id: u64,
    /// File name, unique within its release
    pub name: String,
    /// Upload timestamp
    pub created_at: DateTime<Utc>,
}

/// Operations the core requires from the remote release host.
///
/// Every call is attempted exactly once per logical step; retry policy,
/// if any, belongs to the transport layer.
#[allow(async_fn_in_trait)]
pub trait ReleaseStore {
    /// Look up a release by tag. `None` when no release carries the tag.
    async fn get_release_by_tag(&self, tag: &str) -> Result<Option<ReleaseRecord>>;

    /// Create a release for `tag`. Fails if the tag is already released.
    async fn create_release(&self, tag: &str, prerelease: bool, body: &str)
    -> Result<ReleaseRecord>;

    /// List the assets currently attached to `release`
    async fn list_assets(&self, release: &ReleaseRecord) -> Result<Vec<AssetRecord>>;

    /// Upload `file` as an asset named `name`, streaming its bytes with
    /// the byte length declared up front
    async fn upload_asset(
        &self,
        release: &ReleaseRecord,
        name: &str,
        content_type: &str,
        file: &Path,
    ) -> Result<AssetRecord>;

    /// Delete a single asset by id
    async fn delete_asset(&self, asset_id: u64) -> Result<()>;

    /// Numbers of all open issues carrying `label`
    async fn list_open_issues(&self, label: &str) -> Result<Vec<u64>>;

    /// Post a comment on `issue`
    async fn create_issue_comment(&self, issue: u64, body: &str) -> Result<()>;
}
