//! Dependency enumeration: where the list of installed packages comes from.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::models::Dependency;

pub mod pnpm;

/// Where to read the `pnpm licenses list --json` document from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySource {
    /// Run pnpm in the project directory.
    Pnpm { prod: bool },
    /// Read the JSON document from stdin.
    Stdin,
    /// Read the JSON document from a file.
    File(PathBuf),
}

/// Load and flatten the dependency listing for `project`.
pub async fn load_dependencies(source: &DependencySource, project: &Path) -> Result<Vec<Dependency>> {
    let content = match source {
        DependencySource::Pnpm { prod } => pnpm::run_pnpm(project, *prod).await?,
        DependencySource::Stdin => {
            let mut content = String::new();
            tokio::io::stdin()
                .read_to_string(&mut content)
                .await
                .context("Failed to read dependency listing from stdin")?;
            content
        }
        DependencySource::File(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read dependency listing {}", path.display()))?,
    };

    Ok(pnpm::parse_pnpm_json(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_from_file() {
        let json = r#"{"MIT": [{"name": "ms", "version": "2.1.3", "path": "/p/ms", "license": "MIT"}]}"#;
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{}", json).unwrap();

        let source = DependencySource::File(f.path().to_path_buf());
        let deps = load_dependencies(&source, Path::new(".")).await.unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].name, "ms");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let source = DependencySource::File(PathBuf::from("/no/such/listing.json"));
        let err = load_dependencies(&source, Path::new(".")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read dependency listing"));
    }
}
