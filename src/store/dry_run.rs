//! Log-only wrapper used when no CI service is detected.
//!
//! Reads are forwarded to the wrapped store so the decision output matches
//! what a real run would choose; every mutation is replaced by a log line
//! and, where a record is expected back, a synthesized placeholder.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;

use crate::error::Result;

use super::{AssetRecord, ReleaseRecord, ReleaseStore};

/// Wraps any store, forwarding reads and logging writes
///
/// Would-be deletions are tracked so later reads see the state a real run
/// would have produced; without that, a delete-then-upload sequence would
/// diverge from the real path on its collision re-check.
pub struct DryRunStore<S> {
    inner: S,
    deleted_assets: Mutex<HashSet<u64>>,
}

impl<S> DryRunStore<S> {
    /// Wrap `inner`
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            deleted_assets: Mutex::new(HashSet::new()),
        }
    }

    /// Access the wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn is_deleted(&self, asset_id: u64) -> bool {
        self.deleted_assets
            .lock()
            .map(|deleted| deleted.contains(&asset_id))
            .unwrap_or(false)
    }
}

impl<S: ReleaseStore> ReleaseStore for DryRunStore<S> {
    async fn get_release_by_tag(&self, tag: &str) -> Result<Option<ReleaseRecord>> {
        self.inner.get_release_by_tag(tag).await
    }

    async fn create_release(
        &self,
        tag: &str,
        prerelease: bool,
        body: &str,
    ) -> Result<ReleaseRecord> {
        log::info!("[dry run] would create release '{tag}' (prerelease: {prerelease}, body: {} bytes)", body.len());
        Ok(ReleaseRecord {
            tag_name: tag.to_string(),
            id: 0,
            upload_url: String::new(),
            html_url: format!("(dry run) release {tag}"),
            assets: Vec::new(),
        })
    }

    async fn list_assets(&self, release: &ReleaseRecord) -> Result<Vec<AssetRecord>> {
        // Placeholder records from a dry-run create have no remote side.
        if release.id == 0 {
            return Ok(Vec::new());
        }
        let assets = self.inner.list_assets(release).await?;
        Ok(assets
            .into_iter()
            .filter(|asset| !self.is_deleted(asset.id))
            .collect())
    }

    async fn upload_asset(
        &self,
        release: &ReleaseRecord,
        name: &str,
        content_type: &str,
        file: &Path,
    ) -> Result<AssetRecord> {
        log::info!(
            "[dry run] would upload '{name}' ({content_type}) from {} to release '{}'",
            file.display(),
            release.tag_name
        );
        Ok(AssetRecord {
            id: 0,
            name: name.to_string(),
            created_at: Utc::now(),
        })
    }

    async fn delete_asset(&self, asset_id: u64) -> Result<()> {
        log::info!("[dry run] would delete asset {asset_id}");
        if let Ok(mut deleted) = self.deleted_assets.lock() {
            deleted.insert(asset_id);
        }
        Ok(())
    }

    async fn list_open_issues(&self, label: &str) -> Result<Vec<u64>> {
        self.inner.list_open_issues(label).await
    }

    async fn create_issue_comment(&self, issue: u64, body: &str) -> Result<()> {
        log::info!("[dry run] would comment on issue #{issue}:\n{body}");
        Ok(())
    }
}
