//! Error types for rollout operations.
//!
//! Fatal errors abort the run with a non-zero exit status and a single
//! human-readable message. Best-effort failures (stale-asset deletion,
//! legacy-pointer cleanup, announcement posting) never surface here; they
//! are logged at their unit of work and the run continues.

use thiserror::Error;

/// Result type alias for rollout operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all rollout operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Tag/branch/version validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Release store (remote host) errors
    #[error("Release store error: {0}")]
    Store(#[from] StoreError),

    /// Asset lifecycle errors
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// CLI argument and configuration errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Tagged-release validation errors
///
/// All of these are fatal and checked before any remote mutation.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// CI tag does not match the declared package version
    #[error("Tag '{tag}' does not match declared version '{version}' (expected 'v{version}')")]
    TagVersionMismatch {
        /// Tag reported by CI
        tag: String,
        /// Version declared in the package manifest
        version: String,
    },

    /// Tagged build running on a branch other than master
    #[error("Tagged build must run on branch 'master', found '{branch}'")]
    BranchMismatch {
        /// Branch reported by CI
        branch: String,
    },

    /// Declared version failed to parse
    #[error("Failed to parse declared version '{version}': {source}")]
    VersionParseFailed {
        /// Version string from the manifest
        version: String,
        /// Parsing error
        #[source]
        source: semver::Error,
    },
}

/// Release store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// A release for this tag already exists
    #[error("Release for tag '{tag}' already exists. Delete it first or bump the version.")]
    DuplicateRelease {
        /// Tag name
        tag: String,
    },

    /// Expected release record is missing
    #[error("Release for tag '{tag}' not found")]
    ReleaseNotFound {
        /// Tag name
        tag: String,
    },

    /// Remote API returned an unexpected status
    #[error("Release host returned {status} for {operation}: {body}")]
    UnexpectedStatus {
        /// Operation that failed
        operation: String,
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        body: String,
    },

    /// Upload target URL could not be interpreted
    #[error("Invalid upload target '{url}': {reason}")]
    InvalidUploadTarget {
        /// Upload URL from the release record
        url: String,
        /// Reason for the error
        reason: String,
    },
}

/// Asset lifecycle errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset with this name already exists on the release
    #[error("Asset '{name}' already exists on release '{tag}'. Delete it before re-uploading.")]
    NameCollision {
        /// Asset name
        name: String,
        /// Release tag
        tag: String,
    },

    /// Artifact file missing or unreadable
    #[error("Artifact file not found at {path}")]
    ArtifactMissing {
        /// Expected artifact path
        path: std::path::PathBuf,
    },

    /// Artifact file name is not valid UTF-8 or is empty
    #[error("Artifact path {path} has no usable file name")]
    InvalidArtifactName {
        /// Offending path
        path: std::path::PathBuf,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Required configuration is missing
    #[error("Missing configuration: {what}")]
    MissingConfig {
        /// What is missing and where to set it
        what: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Validation(ValidationError::TagVersionMismatch { version, .. }) => vec![
                format!("Re-tag the commit as v{version} to match the manifest"),
                "Or bump the manifest version to match the pushed tag".to_string(),
            ],
            ReleaseError::Validation(ValidationError::BranchMismatch { .. }) => {
                vec!["Push release tags from the master branch only".to_string()]
            }
            ReleaseError::Store(StoreError::DuplicateRelease { tag }) => vec![
                format!("Delete the existing '{tag}' release if it was created in error"),
                "Or bump the version and tag again".to_string(),
            ],
            ReleaseError::Asset(AssetError::NameCollision { name, .. }) => {
                vec![format!("Delete the existing '{name}' asset from the release")]
            }
            ReleaseError::Cli(CliError::MissingConfig { .. }) => vec![
                "Set GH_TOKEN or GITHUB_TOKEN for release host access".to_string(),
                "Set ROLLOUT_REPO=owner/name when the CI provider does not supply it".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable without operator changes
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ReleaseError::Validation(_)
                | ReleaseError::Store(StoreError::DuplicateRelease { .. })
                | ReleaseError::Asset(AssetError::NameCollision { .. })
        )
    }
}
