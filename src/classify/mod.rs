//! Run intent classification.
//!
//! Decides, once per run, what the CI run should do with its artifact.
//! The full ordered rule list is evaluated before any side effect; the
//! resulting [`RunIntent`] drives the whole remainder of the run.

use semver::Version;

use crate::ci::CiContext;
use crate::error::{Result, ValidationError};
use crate::extract::Extraction;

/// Commit-message tag that suppresses releasing entirely
pub const TAG_NORELEASE: &str = "norelease";

/// The single classification outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunIntent {
    /// Pull-request build; publish nothing
    SkipPullRequest,
    /// Commit carries the `norelease` tag
    SkipNoReleaseTag,
    /// Nightly run; publish nothing even when a tag is present
    SkipNightly,
    /// Tag build on master matching the declared version
    TaggedRelease,
    /// Untagged build referencing at least one issue
    RollingBuild,
    /// Nothing to do: no tag, no issues
    SkipNoIssuesNoTag,
}

impl RunIntent {
    /// True for every intent that publishes nothing
    pub fn is_skip(self) -> bool {
        !matches!(self, RunIntent::TaggedRelease | RunIntent::RollingBuild)
    }

    /// Human-readable reason, used for skip logging
    pub fn describe(self) -> &'static str {
        match self {
            RunIntent::SkipPullRequest => "pull request build; not releasing",
            RunIntent::SkipNoReleaseTag => "commit tagged #norelease; not releasing",
            RunIntent::SkipNightly => "nightly run; not releasing",
            RunIntent::TaggedRelease => "tagged release",
            RunIntent::RollingBuild => "rolling build",
            RunIntent::SkipNoIssuesNoTag => "no tag and no referenced issues; nothing to do",
        }
    }
}

/// Classify the run. Rules are evaluated in order; first match wins.
///
/// Tag builds are validated against the declared version and branch before
/// any other rule can fire a release intent; a mismatch is fatal. The
/// nightly rule precedes the tagged-release rule, so a nightly run with a
/// tag present is suppressed rather than published.
pub fn classify(
    ctx: &CiContext,
    extraction: &Extraction,
    declared: &Version,
    nightly: bool,
) -> Result<RunIntent> {
    if ctx.is_pull_request {
        return Ok(RunIntent::SkipPullRequest);
    }

    if let Some(tag) = &ctx.tag {
        validate_tag_build(tag, &ctx.branch, declared)?;
    }

    if extraction.has_tag(TAG_NORELEASE) {
        return Ok(RunIntent::SkipNoReleaseTag);
    }

    if nightly {
        return Ok(RunIntent::SkipNightly);
    }

    if ctx.tag.is_some() {
        return Ok(RunIntent::TaggedRelease);
    }

    if !extraction.issues.is_empty() {
        return Ok(RunIntent::RollingBuild);
    }

    Ok(RunIntent::SkipNoIssuesNoTag)
}

/// Tag builds must carry `v{declared}` and run on master.
fn validate_tag_build(tag: &str, branch: &str, declared: &Version) -> Result<()> {
    let expected = format!("v{declared}");
    if tag != expected {
        return Err(ValidationError::TagVersionMismatch {
            tag: tag.to_string(),
            version: declared.to_string(),
        }
        .into());
    }
    if branch != "master" {
        return Err(ValidationError::BranchMismatch {
            branch: branch.to_string(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;
    use std::collections::BTreeSet;

    fn ctx(branch: &str, tag: Option<&str>, pr: bool) -> CiContext {
        CiContext {
            is_ci: true,
            branch: branch.to_string(),
            tag: tag.map(str::to_string),
            commit_message: String::new(),
            is_pull_request: pr,
        }
    }

    fn version() -> Version {
        Version::parse("1.2.3").unwrap()
    }

    fn extraction(tags: &[&str], issues: &[u64]) -> Extraction {
        Extraction {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            issues: issues.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn pull_request_wins_over_everything() {
        let intent = classify(
            &ctx("master", Some("v1.2.3"), true),
            &extraction(&[], &[1]),
            &version(),
            true,
        )
        .unwrap();
        assert_eq!(intent, RunIntent::SkipPullRequest);
    }

    #[test]
    fn valid_tag_build_classifies_as_tagged_release() {
        let intent = classify(
            &ctx("master", Some("v1.2.3"), false),
            &extraction(&[], &[]),
            &version(),
            false,
        )
        .unwrap();
        assert_eq!(intent, RunIntent::TaggedRelease);
    }

    #[test]
    fn wrong_version_is_fatal() {
        let err = classify(
            &ctx("master", Some("v1.2.4"), false),
            &extraction(&[], &[]),
            &version(),
            false,
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("v1.2.4") || msg.contains("1.2.3"), "{msg}");
        assert!(matches!(
            err,
            ReleaseError::Validation(ValidationError::TagVersionMismatch { .. })
        ));
    }

    #[test]
    fn wrong_branch_is_fatal() {
        let err = classify(
            &ctx("develop", Some("v1.2.3"), false),
            &extraction(&[], &[]),
            &version(),
            false,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::Validation(ValidationError::BranchMismatch { .. })
        ));
        assert!(err.to_string().contains("develop"));
    }

    #[test]
    fn norelease_tag_skips_even_valid_tag_builds() {
        let intent = classify(
            &ctx("master", Some("v1.2.3"), false),
            &extraction(&["norelease"], &[4]),
            &version(),
            false,
        )
        .unwrap();
        assert_eq!(intent, RunIntent::SkipNoReleaseTag);
    }

    #[test]
    fn nightly_suppresses_tagged_release() {
        let intent = classify(
            &ctx("master", Some("v1.2.3"), false),
            &extraction(&[], &[]),
            &version(),
            true,
        )
        .unwrap();
        assert_eq!(intent, RunIntent::SkipNightly);
    }

    #[test]
    fn issues_without_tag_make_a_rolling_build() {
        let intent = classify(
            &ctx("issue-42", None, false),
            &extraction(&[], &[42]),
            &version(),
            false,
        )
        .unwrap();
        assert_eq!(intent, RunIntent::RollingBuild);
    }

    #[test]
    fn nothing_to_do_is_a_noop_skip() {
        let intent = classify(
            &ctx("feature", None, false),
            &extraction(&[], &[]),
            &version(),
            false,
        )
        .unwrap();
        assert_eq!(intent, RunIntent::SkipNoIssuesNoTag);
        assert!(intent.is_skip());
    }
}
