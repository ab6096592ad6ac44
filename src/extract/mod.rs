//! Hashtag and issue-number extraction from commit messages and branches.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Hashtags: `#` preceded by start-of-string or whitespace, followed by
/// one or more alphanumerics.
static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#([[:alnum:]]+)").expect("valid hashtag pattern"));

/// Issue branches: optional `issue-` or `gh-` prefix, digits only.
static ISSUE_BRANCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:issue-|gh-)?([0-9]+)$").expect("valid branch pattern"));

/// Tags and issue numbers extracted from a single CI run's inputs
///
/// Produced as a pure function of `(commit_message, branch)`. The
/// orchestrator may merge tracker-sourced issue numbers in before
/// classification; after that the sets are treated as immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Free-text hashtags from the commit message, case preserved
    pub tags: BTreeSet<String>,
    /// Issue numbers from numeric hashtags and the branch name
    pub issues: BTreeSet<u64>,
}

impl Extraction {
    /// Extract tags and issue numbers from the commit message and branch.
    ///
    /// Non-matching input yields empty sets; duplicates collapse.
    pub fn from_commit(commit_message: &str, branch: &str) -> Self {
        let mut tags = BTreeSet::new();
        let mut issues = BTreeSet::new();

        for capture in HASHTAG.captures_iter(commit_message) {
            let tag = capture[1].to_string();
            if let Ok(number) = tag.parse::<u64>() {
                issues.insert(number);
            }
            tags.insert(tag);
        }

        if let Some(capture) = ISSUE_BRANCH.captures(branch)
            && let Ok(number) = capture[1].parse::<u64>()
        {
            issues.insert(number);
        }

        Self { tags, issues }
    }

    /// Check for a control tag such as `norelease` or `noannounce`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_hashtags_from_message() {
        let ex = Extraction::from_commit("Fix the importer #123 #norelease", "feature");
        assert!(ex.tags.contains("123"));
        assert!(ex.tags.contains("norelease"));
        assert_eq!(ex.issues, BTreeSet::from([123]));
    }

    #[test]
    fn hashtag_requires_leading_boundary() {
        let ex = Extraction::from_commit("see bug#42 and #43", "dev");
        assert!(!ex.tags.contains("42"));
        assert!(ex.tags.contains("43"));
        assert_eq!(ex.issues, BTreeSet::from([43]));
    }

    #[test]
    fn hashtag_at_start_of_message() {
        let ex = Extraction::from_commit("#77 quick fix", "dev");
        assert_eq!(ex.issues, BTreeSet::from([77]));
    }

    #[test]
    fn extraction_is_idempotent_and_order_independent() {
        let a = Extraction::from_commit("#5 then #9 then #5", "dev");
        let b = Extraction::from_commit("#9 and #5", "dev");
        assert_eq!(a, b);
        assert_eq!(a, Extraction::from_commit("#5 then #9 then #5", "dev"));
    }

    #[test]
    fn issue_branch_variants() {
        for branch in ["123", "issue-123", "gh-123"] {
            let ex = Extraction::from_commit("", branch);
            assert_eq!(ex.issues, BTreeSet::from([123]), "branch {branch}");
        }
    }

    #[test]
    fn non_issue_branch_yields_nothing() {
        for branch in ["master", "issue-", "gh-12x", "v1.2.3", "fix-123-thing"] {
            let ex = Extraction::from_commit("", branch);
            assert!(ex.issues.is_empty(), "branch {branch}");
        }
    }

    #[test]
    fn tags_are_case_sensitive() {
        let ex = Extraction::from_commit("msg #NoRelease", "dev");
        assert!(ex.has_tag("NoRelease"));
        assert!(!ex.has_tag("norelease"));
    }
}
