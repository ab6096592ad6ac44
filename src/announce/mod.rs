//! Release announcements posted to referenced issues.

use semver::Version;

use crate::extract::Extraction;
use crate::store::{ReleaseRecord, ReleaseStore};

/// Commit-message tag that suppresses announcements
pub const TAG_NOANNOUNCE: &str = "noannounce";

/// Installation note appended to rolling-build announcements
const INSTALL_INSTRUCTIONS: &str = "To test this build, download the linked \
file and install it via 'Install Add-on From File' in the add-ons manager. \
Test builds are replaced as newer ones are published.";

/// What an announcement is about
pub struct Announcement<'a> {
    /// Release the artifact was uploaded to
    pub release: &'a ReleaseRecord,
    /// Name of the uploaded artifact
    pub asset_name: &'a str,
    /// Declared package version
    pub version: &'a Version,
    /// True for tagged releases, false for rolling builds
    pub tagged: bool,
    /// Raw commit message (included for rolling builds only)
    pub commit_message: &'a str,
}

/// Posts release notifications to every issue in the issue set
pub struct Announcer<'a, S> {
    store: &'a S,
    repo_html_base: String,
}

impl<'a, S: ReleaseStore> Announcer<'a, S> {
    /// Create an announcer posting through `store`.
    ///
    /// `repo_html_base` is the repository's web URL, used to build direct
    /// download links.
    pub fn new(store: &'a S, repo_html_base: String) -> Self {
        Self {
            store,
            repo_html_base,
        }
    }

    /// Announce to every issue in the extraction, sequentially.
    ///
    /// No-op when the commit carries `#noannounce`. A failure to post on
    /// one issue is logged and does not abort the remaining issues.
    /// Returns the number of comments successfully posted.
    pub async fn announce_all(
        &self,
        extraction: &Extraction,
        announcement: &Announcement<'_>,
    ) -> usize {
        if extraction.has_tag(TAG_NOANNOUNCE) {
            log::info!("Commit tagged #noannounce; skipping announcements");
            return 0;
        }

        let body = self.compose(announcement);
        let mut posted = 0;
        for &issue in &extraction.issues {
            match self.store.create_issue_comment(issue, &body).await {
                Ok(()) => {
                    log::info!("Announced release on issue #{issue}");
                    posted += 1;
                }
                Err(e) => {
                    log::warn!("Failed to announce on issue #{issue}: {e}");
                }
            }
        }
        posted
    }

    /// Compose the announcement body
    pub fn compose(&self, announcement: &Announcement<'_>) -> String {
        let label = build_label(announcement);
        let download = format!(
            "{}/releases/download/{}/{}",
            self.repo_html_base, announcement.release.tag_name, announcement.asset_name
        );

        let mut body = format!("{label} is available: {download}");
        if !announcement.tagged {
            body.push_str("\n\n> ");
            body.push_str(announcement.commit_message);
            body.push_str("\n\n");
            body.push_str(INSTALL_INSTRUCTIONS);
        }
        body
    }
}

/// Human label for the build being announced
fn build_label(announcement: &Announcement<'_>) -> String {
    if announcement.tagged {
        if announcement.version.pre.is_empty() {
            format!("Release {}", announcement.release.tag_name)
        } else {
            format!("Prerelease {}", announcement.release.tag_name)
        }
    } else {
        format!("Test build {}", announcement.version)
    }
}
