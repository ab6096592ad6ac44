//! End-to-end release run sequencing.
//!
//! Builds the extraction, merges localization issues, classifies the run,
//! executes the chosen intent against the release store, and fans out
//! announcements. Entirely sequential: every remote call is awaited one at
//! a time and attempted exactly once.

use std::path::Path;

use chrono::Utc;

use crate::ReleaseConfig;
use crate::announce::{Announcement, Announcer};
use crate::assets::{AssetManager, content_type_for, default_cutoff};
use crate::ci::CiContext;
use crate::classify::{RunIntent, classify};
use crate::cli::OutputManager;
use crate::error::{AssetError, Result, StoreError};
use crate::extract::Extraction;
use crate::metadata::PackageMetadata;
use crate::store::{ReleaseRecord, ReleaseStore};

/// What a run decided and how the process should exit
#[derive(Debug, Clone, Copy)]
pub struct RunOutcome {
    /// The classification that drove the run
    pub intent: RunIntent,
    /// Process exit code (0 for success and every intentional skip)
    pub exit_code: i32,
}

/// Execute one release run end to end.
///
/// Dry-run behavior is a property of `store`: callers wrap the real client
/// in [`crate::store::DryRunStore`] when no CI service was detected, so
/// the decision path here is identical either way.
pub async fn run<S: ReleaseStore>(
    store: &S,
    ctx: &CiContext,
    meta: &PackageMetadata,
    config: &ReleaseConfig,
    output: &OutputManager,
) -> Result<RunOutcome> {
    let mut extraction = Extraction::from_commit(&ctx.commit_message, &ctx.branch);

    // Localization work lands on a shared branch with no issue references
    // of its own; pull in every open issue under the translation label so
    // translators see the build announcements.
    if ctx.branch == config.localization_branch {
        output.info(&format!(
            "Localization branch; collecting open '{}' issues",
            config.translation_label
        ));
        let labeled = store.list_open_issues(&config.translation_label).await?;
        extraction.issues.extend(labeled);
    }
    let extraction = extraction;

    let intent = classify(ctx, &extraction, &meta.version, config.nightly)?;
    output.info(&format!("Run classified as: {}", intent.describe()));

    if intent.is_skip() {
        return Ok(RunOutcome {
            intent,
            exit_code: 0,
        });
    }

    let assets = AssetManager::new(store);
    let artifact = config.artifact.as_path();
    let asset_name = artifact_name(artifact)?;

    let release = match intent {
        RunIntent::TaggedRelease => {
            publish_tagged(store, &assets, meta, config, output, artifact).await?
        }
        RunIntent::RollingBuild => {
            publish_rolling(store, &assets, config, output, artifact).await?
        }
        _ => unreachable!("skip intents returned above"),
    };

    let announcer = Announcer::new(store, format!("https://github.com/{}", config.repo_slug));
    let announcement = Announcement {
        release: &release,
        asset_name: &asset_name,
        version: &meta.version,
        tagged: intent == RunIntent::TaggedRelease,
        commit_message: &ctx.commit_message,
    };
    let posted = announcer.announce_all(&extraction, &announcement).await;
    if posted > 0 {
        output.success(&format!("Announced on {posted} issue(s)"));
    }

    Ok(RunOutcome {
        intent,
        exit_code: 0,
    })
}

/// Tagged release: duplicate check, create, primary upload, legacy pointer.
async fn publish_tagged<S: ReleaseStore>(
    store: &S,
    assets: &AssetManager<'_, S>,
    meta: &PackageMetadata,
    config: &ReleaseConfig,
    output: &OutputManager,
    artifact: &Path,
) -> Result<ReleaseRecord> {
    let tag = format!("v{}", meta.version);

    if store.get_release_by_tag(&tag).await?.is_some() {
        return Err(StoreError::DuplicateRelease { tag }.into());
    }

    output.info(&format!("🚀 Creating release {tag}..."));
    let prerelease = !meta.version.pre.is_empty();
    let release = store
        .create_release(&tag, prerelease, &config.release_body)
        .await?;

    output.info(&format!("⬆️  Uploading {}...", artifact.display()));
    let asset = assets
        .upload_asset(&release, artifact, content_type_for(artifact))
        .await?;
    output.success(&format!("Uploaded {}", asset.name));

    update_legacy_pointer(store, assets, meta, config, output, &tag, &asset.name).await?;

    Ok(release)
}

/// Rolling build: reuse the fixed rolling release, expire, upload.
async fn publish_rolling<S: ReleaseStore>(
    store: &S,
    assets: &AssetManager<'_, S>,
    config: &ReleaseConfig,
    output: &OutputManager,
    artifact: &Path,
) -> Result<ReleaseRecord> {
    let release = get_or_create(
        store,
        &config.rolling_tag,
        true,
        "Rolling builds. Assets here are test builds and expire after a week.",
    )
    .await?;

    let expired = assets
        .expire_stale_assets(&release, default_cutoff(Utc::now()))
        .await?;
    if expired > 0 {
        output.info(&format!("Expired {expired} stale build(s)"));
    }

    output.info(&format!("⬆️  Uploading {}...", artifact.display()));
    let asset = assets
        .upload_asset(&release, artifact, content_type_for(artifact))
        .await?;
    output.success(&format!("Uploaded {}", asset.name));

    Ok(release)
}

/// Refresh the fixed-name pointer asset on the stable legacy release so
/// old clients can discover the newly tagged artifact.
async fn update_legacy_pointer<S: ReleaseStore>(
    store: &S,
    assets: &AssetManager<'_, S>,
    meta: &PackageMetadata,
    config: &ReleaseConfig,
    output: &OutputManager,
    tag: &str,
    asset_name: &str,
) -> Result<()> {
    let legacy_tag = meta.legacy_release_tag();
    let legacy_release = get_or_create(
        store,
        &legacy_tag,
        false,
        "Stable pointer to the latest release. Do not delete.",
    )
    .await?;

    let pointer = serde_json::json!({
        "name": meta.name,
        "version": meta.version.to_string(),
        "tag": tag,
        "url": format!(
            "https://github.com/{}/releases/download/{tag}/{asset_name}",
            config.repo_slug
        ),
    });
    // Staged under a scoped temp file; the asset name comes from config,
    // so the on-disk name is irrelevant and the file is removed on drop.
    let staged = tempfile::NamedTempFile::new()?;
    std::fs::write(staged.path(), serde_json::to_vec_pretty(&pointer)?)?;

    output.info(&format!(
        "Updating legacy pointer '{}' on {legacy_tag}...",
        config.legacy_asset_name
    ));
    assets
        .replace_legacy_pointer(
            &legacy_release,
            &config.legacy_asset_name,
            staged.path(),
            "application/json",
        )
        .await?;
    Ok(())
}

async fn get_or_create<S: ReleaseStore>(
    store: &S,
    tag: &str,
    prerelease: bool,
    body: &str,
) -> Result<ReleaseRecord> {
    match store.get_release_by_tag(tag).await? {
        Some(release) => Ok(release),
        None => store.create_release(tag, prerelease, body).await,
    }
}

fn artifact_name(path: &Path) -> Result<String> {
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
