//! GitHub REST v3 implementation of the release store.

use std::path::Path;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use url::Url;

use crate::error::{AssetError, ReleaseError, Result, StoreError};

use super::{AssetRecord, ReleaseRecord, ReleaseStore};

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("rollout/", env!("CARGO_PKG_VERSION"));

/// GitHub-backed release store client
///
/// The token is optional so dry runs against public repositories can still
/// perform lookups; every mutating endpoint requires it.
pub struct GitHubStore {
    client: Client,
    owner: String,
    repo: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct IssueNumber {
    number: u64,
}

impl GitHubStore {
    /// Create a client for `owner/repo`
    pub fn new(owner: &str, repo: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
            token,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{API_BASE}/repos/{}/{}/{path}", self.owner, self.repo)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(ACCEPT, "application/vnd.github+json");
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn expect_status(
        operation: &str,
        response: Response,
        expected: StatusCode,
    ) -> Result<Response> {
        let status = response.status();
        if status != expected {
            let mut body = response.text().await.unwrap_or_default();
            truncate_to_boundary(&mut body, 512);
            return Err(StoreError::UnexpectedStatus {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            }
            .into());
        }
        Ok(response)
    }

    /// Resolve the upload URL for a release, stripping the `{?name,label}`
    /// URI-template suffix GitHub returns.
    fn upload_target(release: &ReleaseRecord, name: &str) -> Result<Url> {
        let base = release
            .upload_url
            .split('{')
            .next()
            .unwrap_or(&release.upload_url);
        let mut url = Url::parse(base).map_err(|e| StoreError::InvalidUploadTarget {
            url: release.upload_url.clone(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut().append_pair("name", name);
        Ok(url)
    }
}

/// Truncate an error body to at most `max` bytes without splitting a
/// multi-byte character (error bodies can echo non-ASCII release text).
fn truncate_to_boundary(body: &mut String, max: usize) {
    if body.len() <= max {
        return;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body.truncate(end);
}

impl ReleaseStore for GitHubStore {
    async fn get_release_by_tag(&self, tag: &str) -> Result<Option<ReleaseRecord>> {
        let url = self.repo_url(&format!("releases/tags/{tag}"));
        let response = self.authed(self.client.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::expect_status("get release by tag", response, StatusCode::OK).await?;
        Ok(Some(response.json().await?))
    }

    async fn create_release(
        &self,
        tag: &str,
        prerelease: bool,
        body: &str,
    ) -> Result<ReleaseRecord> {
        let url = self.repo_url("releases");
        let payload = serde_json::json!({
            "tag_name": tag,
            "name": tag,
            "body": body,
            "prerelease": prerelease,
        });
        let response = self.authed(self.client.post(url)).json(&payload).send().await?;
        let response = Self::expect_status("create release", response, StatusCode::CREATED).await?;
        Ok(response.json().await?)
    }

    async fn list_assets(&self, release: &ReleaseRecord) -> Result<Vec<AssetRecord>> {
        let url = self.repo_url(&format!("releases/{}/assets?per_page=100", release.id));
        let response = self.authed(self.client.get(url)).send().await?;
        let response = Self::expect_status("list assets", response, StatusCode::OK).await?;
        Ok(response.json().await?)
    }

    async fn upload_asset(
        &self,
        release: &ReleaseRecord,
        name: &str,
        content_type: &str,
        file: &Path,
    ) -> Result<AssetRecord> {
        let url = Self::upload_target(release, name)?;

        let handle = tokio::fs::File::open(file).await.map_err(|_| {
            ReleaseError::Asset(AssetError::ArtifactMissing {
                path: file.to_path_buf(),
            })
        })?;
        let length = handle.metadata().await?.len();
        let stream = ReaderStream::new(handle);

        let response = self
            .authed(self.client.post(url))
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, length)
            .body(Body::wrap_stream(stream))
            .send()
            .await?;
        let response = Self::expect_status("upload asset", response, StatusCode::CREATED).await?;
        Ok(response.json().await?)
    }

    async fn delete_asset(&self, asset_id: u64) -> Result<()> {
        let url = self.repo_url(&format!("releases/assets/{asset_id}"));
        let response = self.authed(self.client.delete(url)).send().await?;
        Self::expect_status("delete asset", response, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    async fn list_open_issues(&self, label: &str) -> Result<Vec<u64>> {
        let url = self.repo_url(&format!("issues?labels={label}&state=open&per_page=100"));
        let response = self.authed(self.client.get(url)).send().await?;
        let response = Self::expect_status("list open issues", response, StatusCode::OK).await?;
        let issues: Vec<IssueNumber> = response.json().await?;
        Ok(issues.into_iter().map(|issue| issue.number).collect())
    }

    async fn create_issue_comment(&self, issue: u64, body: &str) -> Result<()> {
        let url = self.repo_url(&format!("issues/{issue}/comments"));
        let payload = serde_json::json!({ "body": body });
        let response = self.authed(self.client.post(url)).json(&payload).send().await?;
        Self::expect_status("create issue comment", response, StatusCode::CREATED).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(upload_url: &str) -> ReleaseRecord {
        ReleaseRecord {
            tag_name: "v1.0.0".to_string(),
            id: 7,
            upload_url: upload_url.to_string(),
            html_url: "https://github.com/o/r/releases/tag/v1.0.0".to_string(),
            assets: Vec::new(),
        }
    }

    #[test]
    fn upload_target_strips_uri_template() {
        let url = GitHubStore::upload_target(
            &release("https://uploads.github.com/repos/o/r/releases/7/assets{?name,label}"),
            "pkg-1.0.xpi",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://uploads.github.com/repos/o/r/releases/7/assets?name=pkg-1.0.xpi"
        );
    }

    #[test]
    fn upload_target_rejects_garbage() {
        assert!(GitHubStore::upload_target(&release("not a url"), "a.xpi").is_err());
    }

    #[test]
    fn error_body_truncation_respects_char_boundaries() {
        // Byte 512 lands inside the two-byte 'é'
        let mut body = "a".repeat(511);
        body.push('é');
        body.push_str("tail");
        truncate_to_boundary(&mut body, 512);
        assert_eq!(body.len(), 511);
        assert!(body.chars().all(|c| c == 'a'));
    }

    #[test]
    fn short_error_bodies_are_untouched() {
        let mut body = "détail".to_string();
        truncate_to_boundary(&mut body, 512);
        assert_eq!(body, "détail");
    }
}
