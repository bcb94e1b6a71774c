use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// A single installed package as reported by `pnpm licenses list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub name: String,
    pub version: String,
    /// Directory the package is installed in.
    pub path: PathBuf,
    /// SPDX identifier declared by the package.
    pub license: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Dependency {
    /// Author, treating an empty string as absent.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref().filter(|a| !a.is_empty())
    }

    /// Homepage, treating an empty string as absent.
    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_deref().filter(|h| !h.is_empty())
    }
}

/// Which strategy produced a dependency's license text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolvedBy {
    LicenseFile,
    ReadmeSearch,
    FallbackAuthor,
    FallbackHomepage,
}

impl std::fmt::Display for ResolvedBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedBy::LicenseFile => write!(f, "license-file"),
            ResolvedBy::ReadmeSearch => write!(f, "readme-search"),
            ResolvedBy::FallbackAuthor => write!(f, "fallback-author"),
            ResolvedBy::FallbackHomepage => write!(f, "fallback-homepage"),
        }
    }
}

/// License text produced by one resolution strategy, before it is attached
/// to its dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseText {
    pub text: String,
    pub additional_text: Option<String>,
    pub resolved_by: ResolvedBy,
}

impl LicenseText {
    pub fn new(text: impl Into<String>, resolved_by: ResolvedBy) -> Self {
        Self {
            text: text.into(),
            additional_text: None,
            resolved_by,
        }
    }

    pub fn with_additional_text(mut self, additional: impl Into<String>) -> Self {
        self.additional_text = Some(additional.into());
        self
    }
}

/// A dependency together with the license text that applies to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDependency {
    #[serde(flatten)]
    pub dependency: Dependency,
    pub license_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_text: Option<String>,
    pub resolved_by: ResolvedBy,
}

impl ResolvedDependency {
    pub fn new(dependency: Dependency, license: LicenseText) -> Self {
        Self {
            dependency,
            license_text: license.text,
            additional_text: license.additional_text,
            resolved_by: license.resolved_by,
        }
    }

    pub fn name(&self) -> &str {
        &self.dependency.name
    }

    pub fn version(&self) -> &str {
        &self.dependency.version
    }
}

/// A dependency that could not be resolved and the reason why.
#[derive(Debug)]
pub struct Failure {
    pub dependency: Dependency,
    pub error: ResolveError,
}

/// Result of resolving a single dependency.
#[derive(Debug)]
pub enum ResolutionOutcome {
    Success(ResolvedDependency),
    Failure(Failure),
}

impl ResolutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ResolutionOutcome::Success(_))
    }
}
