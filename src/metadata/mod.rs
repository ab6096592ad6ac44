//! Package metadata from the released project's Cargo.toml

use std::path::Path;

use semver::Version;

use crate::error::{CliError, ReleaseError, Result, ValidationError};

/// Package metadata extracted from Cargo.toml
#[derive(Debug, Clone)]
pub struct PackageMetadata {
    /// Package name from Cargo.toml
    pub name: String,
    /// Declared package version
    pub version: Version,
}

impl PackageMetadata {
    /// Default artifact file name for this package, `{name}-{version}.xpi`
    pub fn default_artifact_name(&self) -> String {
        format!("{}-{}.xpi", self.name, self.version)
    }

    /// Tag under which old clients look for the latest-artifact pointer
    pub fn legacy_release_tag(&self) -> String {
        format!("{}-latest", self.name)
    }
}

/// Extract name and version from the Cargo.toml [package] section
pub fn extract_metadata(cargo_toml_path: &Path) -> Result<PackageMetadata> {
    let manifest = std::fs::read_to_string(cargo_toml_path).map_err(|e| {
        ReleaseError::Cli(CliError::InvalidArguments {
            reason: format!("Failed to read {}: {}", cargo_toml_path.display(), e),
        })
    })?;

    let toml_value: toml::Value = toml::from_str(&manifest)?;

    let package = toml_value.get("package").ok_or_else(|| {
        ReleaseError::Cli(CliError::InvalidArguments {
            reason: format!("No [package] section in {}", cargo_toml_path.display()),
        })
    })?;

    let name = package
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            ReleaseError::Cli(CliError::InvalidArguments {
                reason: "Missing package.name in manifest".to_string(),
            })
        })?
        .to_string();

    let raw_version = package
        .get("version")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            ReleaseError::Cli(CliError::InvalidArguments {
                reason: "Missing package.version in manifest".to_string(),
            })
        })?;

    let version = Version::parse(raw_version).map_err(|source| {
        ReleaseError::Validation(ValidationError::VersionParseFailed {
            version: raw_version.to_string(),
            source,
        })
    })?;

    Ok(PackageMetadata { name, version })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_manifest(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write manifest");
        file
    }

    #[test]
    fn reads_name_and_version() {
        let file = write_manifest("[package]\nname = \"pkg\"\nversion = \"1.0.0\"\n");
        let meta = extract_metadata(file.path()).unwrap();
        assert_eq!(meta.name, "pkg");
        assert_eq!(meta.version, Version::parse("1.0.0").unwrap());
        assert_eq!(meta.default_artifact_name(), "pkg-1.0.0.xpi");
        assert_eq!(meta.legacy_release_tag(), "pkg-latest");
    }

    #[test]
    fn rejects_bad_version() {
        let file = write_manifest("[package]\nname = \"pkg\"\nversion = \"not-semver\"\n");
        assert!(extract_metadata(file.path()).is_err());
    }

    #[test]
    fn rejects_missing_package_section() {
        let file = write_manifest("[lib]\nname = \"pkg\"\n");
        assert!(extract_metadata(file.path()).is_err());
    }
}
