//! Asset lifecycle management: collision-checked uploads, stale-asset
//! expiry, and legacy pointer replacement.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};

use crate::error::{AssetError, Result};
use crate::store::{AssetRecord, ReleaseRecord, ReleaseStore};

/// Stale rolling-build assets are expired after this many days
pub const STALE_AFTER_DAYS: i64 = 7;

/// Asset operations against a single release store
pub struct AssetManager<'a, S> {
    store: &'a S,
}

impl<'a, S: ReleaseStore> AssetManager<'a, S> {
    /// Create a manager over `store`
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Upload `file_path` to `release`, named after its base name.
    ///
    /// Fails fatally before any transfer if the release already carries an
    /// asset of that name. Callers needing replacement must delete first.
    pub async fn upload_asset(
        &self,
        release: &ReleaseRecord,
        file_path: &Path,
        content_type: &str,
    ) -> Result<AssetRecord> {
        let name = asset_name(file_path)?;
        self.upload_named(release, &name, file_path, content_type).await
    }

    /// Delete every asset on `release` strictly older than `cutoff`.
    ///
    /// Deletions are best-effort per asset: a failed delete is logged and
    /// the remaining assets are still processed. Returns the number of
    /// assets actually deleted.
    pub async fn expire_stale_assets(
        &self,
        release: &ReleaseRecord,
        cutoff: DateTime<Utc>,
    ) -> Result<usize> {
        let assets = self.store.list_assets(release).await?;
        let mut deleted = 0;
        for asset in assets {
            if asset.created_at >= cutoff {
                continue;
            }
            match self.store.delete_asset(asset.id).await {
                Ok(()) => {
                    log::info!("Expired stale asset '{}' (uploaded {})", asset.name, asset.created_at);
                    deleted += 1;
                }
                Err(e) => {
                    log::warn!("Failed to expire stale asset '{}': {e}", asset.name);
                }
            }
        }
        Ok(deleted)
    }

    /// Replace the fixed-name pointer asset on `release`.
    ///
    /// Any existing asset of that name is deleted first (failure logged,
    /// non-fatal), then the replacement goes through the collision-checked
    /// upload path.
    pub async fn replace_legacy_pointer(
        &self,
        release: &ReleaseRecord,
        name: &str,
        file_path: &Path,
        content_type: &str,
    ) -> Result<AssetRecord> {
        let assets = self.store.list_assets(release).await?;
        if let Some(existing) = assets.iter().find(|asset| asset.name == name)
            && let Err(e) = self.store.delete_asset(existing.id).await
        {
            log::warn!("Failed to delete legacy pointer asset '{name}': {e}");
        }
        self.upload_named(release, name, file_path, content_type).await
    }

    async fn upload_named(
        &self,
        release: &ReleaseRecord,
        name: &str,
        file_path: &Path,
        content_type: &str,
    ) -> Result<AssetRecord> {
        let existing = self.store.list_assets(release).await?;
        if existing.iter().any(|asset| asset.name == name) {
            return Err(AssetError::NameCollision {
                name: name.to_string(),
                tag: release.tag_name.clone(),
            }
            .into());
        }
        self.store.upload_asset(release, name, content_type, file_path).await
    }
}

/// Default cutoff for stale-asset expiry relative to `now`
pub fn default_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(STALE_AFTER_DAYS)
}

/// Asset name from the artifact's base file name
fn asset_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            AssetError::InvalidArtifactName {
                path: path.to_path_buf(),
            }
            .into()
        })
}

/// MIME type for an artifact, by extension
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("xpi") | Some("zip") => "application/zip",
        Some("json") => "application/json",
        Some("rdf") | Some("xml") => "application/xml",
        Some("gz") | Some("tgz") => "application/gzip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_name_is_the_base_name() {
        assert_eq!(asset_name(Path::new("build/pkg-1.0.xpi")).unwrap(), "pkg-1.0.xpi");
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for(Path::new("a.xpi")), "application/zip");
        assert_eq!(content_type_for(Path::new("update.json")), "application/json");
        assert_eq!(content_type_for(Path::new("blob")), "application/octet-stream");
    }

    #[test]
    fn cutoff_is_seven_days_before_now() {
        let now = Utc::now();
        assert_eq!(now - default_cutoff(now), Duration::days(7));
    }
}
