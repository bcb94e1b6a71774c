//! Best-effort resolution of many dependencies at once.

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::license::resolver::LicenseTextResolver;
use crate::models::{Dependency, Failure, ResolutionOutcome, ResolvedDependency};

/// Default number of dependencies resolved concurrently.
pub const DEFAULT_CONCURRENCY: usize = 64;

/// Outcome of a batch, split into resolved and unresolved dependencies.
///
/// Both lists keep the relative order of the input.
#[derive(Debug, Default)]
pub struct BatchResolution {
    pub successes: Vec<ResolvedDependency>,
    pub failures: Vec<Failure>,
}

impl BatchResolution {
    /// Partition index-tagged outcomes, restoring input order in each half
    /// regardless of the order the outcomes arrived in.
    pub fn from_outcomes(outcomes: Vec<(usize, ResolutionOutcome)>) -> Self {
        let mut successes = Vec::new();
        let mut failures = Vec::new();

        for (index, outcome) in outcomes {
            match outcome {
                ResolutionOutcome::Success(resolved) => successes.push((index, resolved)),
                ResolutionOutcome::Failure(failure) => failures.push((index, failure)),
            }
        }

        successes.sort_by_key(|(index, _)| *index);
        failures.sort_by_key(|(index, _)| *index);

        Self {
            successes: successes.into_iter().map(|(_, r)| r).collect(),
            failures: failures.into_iter().map(|(_, f)| f).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve every dependency, never failing as a whole.
pub async fn resolve_all(
    resolver: &LicenseTextResolver,
    dependencies: &[Dependency],
    concurrency: usize,
) -> BatchResolution {
    resolve_all_with(resolver, dependencies, concurrency, |_| {}).await
}

/// Like [`resolve_all`], calling `on_settled` as each dependency finishes
/// (in completion order).
pub async fn resolve_all_with<F>(
    resolver: &LicenseTextResolver,
    dependencies: &[Dependency],
    concurrency: usize,
    mut on_settled: F,
) -> BatchResolution
where
    F: FnMut(&ResolutionOutcome),
{
    let outcomes: Vec<(usize, ResolutionOutcome)> = stream::iter(dependencies.iter().enumerate())
        .map(|(index, dependency)| async move {
            let outcome = match resolver.resolve(dependency).await {
                Ok(resolved) => ResolutionOutcome::Success(resolved),
                Err(error) => {
                    debug!(name = %dependency.name, version = %dependency.version, %error, "unresolved");
                    ResolutionOutcome::Failure(Failure {
                        dependency: dependency.clone(),
                        error,
                    })
                }
            };
            (index, outcome)
        })
        .buffer_unordered(concurrency.max(1))
        .inspect(|(_, outcome)| on_settled(outcome))
        .collect()
        .await;

    let batch = BatchResolution::from_outcomes(outcomes);
    info!(
        resolved = batch.successes.len(),
        unresolved = batch.failures.len(),
        "license resolution finished"
    );
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::license::spdx::TemplateRegistry;
    use crate::models::{LicenseText, ResolvedBy};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn dep(name: &str, path: &Path, license: &str) -> Dependency {
        Dependency {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            path: path.to_path_buf(),
            license: license.to_string(),
            author: None,
            homepage: None,
            description: None,
        }
    }

    fn resolver() -> LicenseTextResolver {
        LicenseTextResolver::new(Arc::new(TemplateRegistry::builtin()))
    }

    #[tokio::test]
    async fn test_failure_at_index_two() {
        let dir = TempDir::new().unwrap();
        let deps: Vec<Dependency> = (0..6)
            .map(|i| {
                let license = if i == 2 { "Unknown-License-XYZ" } else { "MIT" };
                dep(&format!("pkg-{i}"), dir.path(), license)
            })
            .collect();

        let batch = resolve_all(&resolver(), &deps, 3).await;

        let names: Vec<&str> = batch.successes.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["pkg-0", "pkg-1", "pkg-3", "pkg-4", "pkg-5"]);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].dependency, deps[2]);
        assert!(matches!(batch.failures[0].error, ResolveError::MissingLicense(_)));
    }

    #[tokio::test]
    async fn test_io_failures_do_not_abort_batch() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("LICENSE"), "License text").unwrap();
        let deps = vec![
            dep("missing-a", &PathBuf::from("/no/such/dir/a"), "MIT"),
            dep("present", dir.path(), "MIT"),
            dep("missing-b", &PathBuf::from("/no/such/dir/b"), "MIT"),
        ];

        let batch = resolve_all(&resolver(), &deps, DEFAULT_CONCURRENCY).await;
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.successes[0].license_text, "License text");
        let failed: Vec<&str> = batch.failures.iter().map(|f| f.dependency.name.as_str()).collect();
        assert_eq!(failed, ["missing-a", "missing-b"]);
    }

    #[tokio::test]
    async fn test_every_dependency_settles_once() {
        let dir = TempDir::new().unwrap();
        let deps: Vec<Dependency> = (0..20)
            .map(|i| dep(&format!("pkg-{i}"), dir.path(), if i % 3 == 0 { "Nope" } else { "ISC" }))
            .collect();

        let mut settled = 0;
        let batch = resolve_all_with(&resolver(), &deps, 4, |_| settled += 1).await;
        assert_eq!(settled, 20);
        assert_eq!(batch.successes.len(), 13);
        assert_eq!(batch.failures.len(), 7);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let batch = resolve_all(&resolver(), &[], 0).await;
        assert!(batch.is_empty());
    }

    #[test]
    fn test_from_outcomes_restores_order() {
        let path = Path::new("/p");
        let outcome = |i: usize| {
            let d = dep(&format!("pkg-{i}"), path, "MIT");
            if i % 2 == 0 {
                ResolutionOutcome::Success(ResolvedDependency::new(
                    d,
                    LicenseText::new("text", ResolvedBy::LicenseFile),
                ))
            } else {
                ResolutionOutcome::Failure(Failure {
                    error: ResolveError::missing(&d),
                    dependency: d,
                })
            }
        };

        let arrived = [5, 2, 0, 3, 4, 1].into_iter().map(|i| (i, outcome(i))).collect();
        let batch = BatchResolution::from_outcomes(arrived);

        let ok: Vec<&str> = batch.successes.iter().map(|r| r.name()).collect();
        let failed: Vec<&str> = batch.failures.iter().map(|f| f.dependency.name.as_str()).collect();
        assert_eq!(ok, ["pkg-0", "pkg-2", "pkg-4"]);
        assert_eq!(failed, ["pkg-1", "pkg-3", "pkg-5"]);
    }
}
