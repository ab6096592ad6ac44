//! Command line interface for rollout.

mod args;
mod output;

pub use args::Args;
pub use output::OutputManager;

use crate::ReleaseConfig;
use crate::ci::CiContext;
use crate::error::{CliError, Result};
use crate::metadata::{self, PackageMetadata};
use crate::orchestrator;
use crate::store::{DryRunStore, GitHubStore};

/// Main CLI entry point; returns the process exit code
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let output = OutputManager::new(args.quiet);

    let ctx = CiContext::from_env();
    let meta = metadata::extract_metadata(&args.manifest)?;
    let config = build_config(&args, &ctx, &meta)?;

    let (owner, repo) = split_slug(&config.repo_slug, ctx.is_ci)?;
    let token = github_token(ctx.is_ci)?;
    let store = GitHubStore::new(owner, repo, token)?;

    let outcome = if ctx.is_ci {
        orchestrator::run(&store, &ctx, &meta, &config, &output).await?
    } else {
        output.warn("No CI service detected; dry run, nothing will be uploaded");
        let store = DryRunStore::new(store);
        orchestrator::run(&store, &ctx, &meta, &config, &output).await?
    };

    Ok(outcome.exit_code)
}

/// Assemble the run configuration from arguments and the environment
fn build_config(args: &Args, ctx: &CiContext, meta: &PackageMetadata) -> Result<ReleaseConfig> {
    let repo_slug = std::env::var("ROLLOUT_REPO")
        .ok()
        .filter(|slug| !slug.is_empty())
        .or_else(CiContext::repo_slug)
        .unwrap_or_default();
    if repo_slug.is_empty() && !ctx.is_ci {
        log::warn!("Repository not configured; set ROLLOUT_REPO=owner/name");
    }

    let nightly = matches!(
        std::env::var("ROLLOUT_NIGHTLY").as_deref(),
        Ok("true") | Ok("1")
    );

    let artifact = args.artifact.clone().unwrap_or_else(|| {
        std::path::PathBuf::from("build").join(meta.default_artifact_name())
    });

    Ok(ReleaseConfig {
        repo_slug,
        nightly,
        release_body: args.release_body.clone(),
        artifact,
        ..ReleaseConfig::default()
    })
}

fn split_slug(slug: &str, is_ci: bool) -> Result<(&str, &str)> {
    match slug.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => Ok((owner, repo)),
        _ if is_ci => Err(CliError::MissingConfig {
            what: "repository slug (ROLLOUT_REPO=owner/name)".to_string(),
        }
        .into()),
        // Dry runs may never touch the store; fail lazily if they do.
        _ => Ok(("", "")),
    }
}

fn github_token(is_ci: bool) -> Result<Option<String>> {
    let token = std::env::var("GH_TOKEN")
        .or_else(|_| std::env::var("GITHUB_TOKEN"))
        .ok()
        .filter(|token| !token.is_empty());
    if token.is_none() && is_ci {
        return Err(CliError::MissingConfig {
            what: "release host token (GH_TOKEN or GITHUB_TOKEN)".to_string(),
        }
        .into());
    }
    Ok(token)
}
