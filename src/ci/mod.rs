//! CI provider context detection.
//!
//! Normalizes CI-provider facts (branch, tag, commit message, pull-request
//! flag) into a single read-only [`CiContext`]. When no recognized CI
//! service is detected, the run is a dry run and the branch is read from
//! the local working copy instead.

use std::process::Command;

/// Normalized facts about the current CI run
///
/// Constructed once per run. Missing values default to empty/false; there
/// are no error conditions.
#[derive(Debug, Clone)]
pub struct CiContext {
    /// True when a recognized CI service is running this process.
    /// False means dry run: no remote mutation is performed.
    pub is_ci: bool,
    /// Branch under build (empty if unknown)
    pub branch: String,
    /// Tag under build; `Some` only on tag builds
    pub tag: Option<String>,
    /// Full commit message of the build's head commit
    pub commit_message: String,
    /// True when the build was triggered by a pull request
    pub is_pull_request: bool,
}

impl CiContext {
    /// Detect the CI provider from the environment and build the context.
    ///
    /// Detection order: GitHub Actions, then Travis. Anything else is a
    /// dry run with the branch sourced from the local git checkout.
    pub fn from_env() -> Self {
        if env("GITHUB_ACTIONS") == "true" {
            return Self::from_github_actions();
        }
        if env("TRAVIS") == "true" {
            return Self::from_travis();
        }

        log::info!("No CI service detected; running in dry-run mode");
        Self {
            is_ci: false,
            branch: local_branch(),
            tag: None,
            commit_message: String::new(),
            is_pull_request: false,
        }
    }

    fn from_github_actions() -> Self {
        let ref_type = env("GITHUB_REF_TYPE");
        let ref_name = env("GITHUB_REF_NAME");
        let (branch, tag) = if ref_type == "tag" {
            // Tag builds still know their source branch via GITHUB_BASE_REF
            // on some triggers; default to master for push-tag events.
            let branch = non_empty(env("ROLLOUT_BRANCH")).unwrap_or_else(|| "master".to_string());
            (branch, non_empty(ref_name))
        } else {
            (ref_name, None)
        };

        Self {
            is_ci: true,
            branch,
            tag,
            // Workflows pass github.event.head_commit.message through this
            // variable; the event payload itself is not parsed here.
            commit_message: env("ROLLOUT_COMMIT_MESSAGE"),
            is_pull_request: env("GITHUB_EVENT_NAME") == "pull_request",
        }
    }

    fn from_travis() -> Self {
        Self {
            is_ci: true,
            branch: env("TRAVIS_BRANCH"),
            tag: non_empty(env("TRAVIS_TAG")),
            commit_message: env("TRAVIS_COMMIT_MESSAGE"),
            is_pull_request: {
                let pr = env("TRAVIS_PULL_REQUEST");
                !pr.is_empty() && pr != "false"
            },
        }
    }

    /// Repository slug (`owner/name`) as reported by the provider, if any
    pub fn repo_slug() -> Option<String> {
        non_empty(env("GITHUB_REPOSITORY")).or_else(|| non_empty(env("TRAVIS_REPO_SLUG")))
    }
}

fn env(key: &str) -> String {
    std::env::var(key).unwrap_or_default()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Read the checked-out branch from the local working copy.
///
/// Returns an empty string when not inside a git repository.
fn local_branch() -> String {
    Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_filters_blank_values() {
        assert_eq!(non_empty(String::new()), None);
        assert_eq!(non_empty("master".to_string()), Some("master".to_string()));
    }

    #[test]
    fn context_defaults_are_inert() {
        let ctx = CiContext {
            is_ci: false,
            branch: String::new(),
            tag: None,
            commit_message: String::new(),
            is_pull_request: false,
        };
        assert!(!ctx.is_ci);
        assert!(ctx.tag.is_none());
    }
}
