use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::ResolveError;
use crate::license::patterns::LicensePatterns;
use crate::license::spdx::{is_public_domain_like, TemplateRegistry, BSD_PLACEHOLDER, MIT_PLACEHOLDER};
use crate::license::text::{license_section, prettify, strip_indent};
use crate::models::{Dependency, LicenseText, ResolvedBy, ResolvedDependency};

/// One way of finding a dependency's license text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// A `LICENSE`-like file in the package directory.
    LicenseFile,
    /// A full license text under a `License` heading in the README.
    ReadmeSection,
    /// The canonical template for the declared SPDX identifier.
    SpdxTemplate,
}

impl Strategy {
    /// Strategies in the order they are tried; the first hit wins.
    pub const ORDER: [Strategy; 3] = [
        Strategy::LicenseFile,
        Strategy::ReadmeSection,
        Strategy::SpdxTemplate,
    ];
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::LicenseFile => write!(f, "license file"),
            Strategy::ReadmeSection => write!(f, "readme section"),
            Strategy::SpdxTemplate => write!(f, "spdx template"),
        }
    }
}

/// Resolves a single dependency to the license text that applies to it.
///
/// Stateless apart from the shared, read-only template registry, so one
/// resolver can serve any number of concurrent resolutions.
#[derive(Debug, Clone)]
pub struct LicenseTextResolver {
    templates: Arc<TemplateRegistry>,
}

impl LicenseTextResolver {
    pub fn new(templates: Arc<TemplateRegistry>) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub async fn resolve(&self, dependency: &Dependency) -> Result<ResolvedDependency, ResolveError> {
        let license = self.resolve_text(dependency).await?;
        Ok(ResolvedDependency::new(dependency.clone(), license))
    }

    /// Run the strategies in [`Strategy::ORDER`] and return the first hit.
    pub async fn resolve_text(&self, dependency: &Dependency) -> Result<LicenseText, ResolveError> {
        let files = list_files(&dependency.path).await?;

        for strategy in Strategy::ORDER {
            match self.attempt(strategy, dependency, &files).await? {
                Some(license) => {
                    debug!(
                        name = %dependency.name,
                        version = %dependency.version,
                        %strategy,
                        resolved_by = %license.resolved_by,
                        "resolved license text"
                    );
                    return Ok(license);
                }
                None => trace!(name = %dependency.name, %strategy, "no match"),
            }
        }

        Err(ResolveError::missing(dependency))
    }

    async fn attempt(
        &self,
        strategy: Strategy,
        dependency: &Dependency,
        files: &[String],
    ) -> Result<Option<LicenseText>, ResolveError> {
        match strategy {
            Strategy::LicenseFile => from_license_file(&dependency.path, files).await,
            Strategy::ReadmeSection => from_readme(&dependency.path, files).await,
            Strategy::SpdxTemplate => Ok(from_template(&self.templates, dependency)),
        }
    }
}

/// Entry names of `dir`, in listing order.
async fn list_files(dir: &Path) -> Result<Vec<String>, ResolveError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ResolveError::io(dir, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ResolveError::io(dir, e))?
    {
        if let Some(name) = entry.file_name().to_str() {
            files.push(name.to_string());
        }
    }
    Ok(files)
}

async fn read_text(path: &Path) -> Result<String, ResolveError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ResolveError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub async fn from_license_file(
    dir: &Path,
    files: &[String],
) -> Result<Option<LicenseText>, ResolveError> {
    let Some(file) = LicensePatterns::shared()?.license_file(files) else {
        return Ok(None);
    };

    let content = read_text(&dir.join(file)).await?;
    Ok(Some(LicenseText::new(
        strip_indent(&content).trim(),
        ResolvedBy::LicenseFile,
    )))
}

/// A README section only counts when it holds a full license text; a
/// one-line pointer such as "Released under the MIT license" is a miss.
pub async fn from_readme(dir: &Path, files: &[String]) -> Result<Option<LicenseText>, ResolveError> {
    let patterns = LicensePatterns::shared()?;
    let Some(file) = patterns.readme_file(files) else {
        return Ok(None);
    };

    let readme = read_text(&dir.join(file)).await?;
    let Some(section) = license_section(&readme)? else {
        return Ok(None);
    };

    match patterns.full_text_family(section) {
        Some(family) => {
            trace!(file, family, "readme contains a full license text");
            Ok(Some(LicenseText::new(prettify(section)?, ResolvedBy::ReadmeSearch)))
        }
        None => Ok(None),
    }
}

/// Synthesize a license text from the template for the declared identifier.
pub fn from_template(templates: &TemplateRegistry, dependency: &Dependency) -> Option<LicenseText> {
    let id = dependency.license.as_str();
    let template = templates.get(id)?;
    let author = dependency.author();
    let homepage = dependency.homepage();

    if is_public_domain_like(id) {
        if let Some(author) = author {
            return Some(
                LicenseText::new(template, ResolvedBy::FallbackAuthor)
                    .with_additional_text(format!("This software was created by {author}")),
            );
        }
        if homepage.is_some() {
            return Some(LicenseText::new(template, ResolvedBy::FallbackHomepage));
        }
    }

    let authors = match (author, homepage) {
        (Some(author), _) => author.to_string(),
        (None, Some(homepage)) => format!("The maintainers of {} <{homepage}>", dependency.name),
        (None, None) => format!("The maintainers of {}", dependency.name),
    };

    let text = match id {
        "MIT" => template.replacen(MIT_PLACEHOLDER, &authors, 1),
        "BSD-3-Clause" | "BSD-2-Clause" => template.replacen(BSD_PLACEHOLDER, &authors, 1),
        _ => format!("Copyright (c) {authors}\n\n{template}"),
    };

    let resolved_by = if author.is_some() {
        ResolvedBy::FallbackAuthor
    } else {
        ResolvedBy::FallbackHomepage
    };

    Some(LicenseText::new(text, resolved_by))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const MIT_BODY: &str = "Permission is hereby granted, free of charge, to any person obtaining a copy of this software.";

    fn dep(path: &Path, license: &str) -> Dependency {
        Dependency {
            name: "pkg".to_string(),
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
    async fn test_license_file_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("LICENSE.md"),
            "\n    MIT License\n\n    Copyright (c) Jane\n      indented\n\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("README.md"), format!("## License\n\n{MIT_BODY}\n")).unwrap();

        let resolved = resolver().resolve(&dep(dir.path(), "MIT")).await.unwrap();
        assert_eq!(resolved.resolved_by, ResolvedBy::LicenseFile);
        assert_eq!(resolved.license_text, "MIT License\n\nCopyright (c) Jane\n  indented");
        assert_eq!(resolved.additional_text, None);
    }

    #[tokio::test]
    async fn test_readme_full_text() {
        let dir = TempDir::new().unwrap();
        let readme = format!(
            "# pkg\n\nUsage.\n\n## License\n\n**Copyright (c) 2020 Jane Doe**\n\n{MIT_BODY}\n\n## Changelog\n\nnothing\n"
        );
        std::fs::write(dir.path().join("README.md"), readme).unwrap();

        let resolved = resolver().resolve(&dep(dir.path(), "MIT")).await.unwrap();
        assert_eq!(resolved.resolved_by, ResolvedBy::ReadmeSearch);
        assert_eq!(
            resolved.license_text,
            format!("Copyright (c) 2020 Jane Doe\n\n{MIT_BODY}")
        );
    }

    #[tokio::test]
    async fn test_readme_pointer_falls_through() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("readme.markdown"),
            "## License\n\nReleased under the [MIT](LICENSE) license.\n",
        )
        .unwrap();
        let mut dependency = dep(dir.path(), "MIT");
        dependency.author = Some("Jane Doe".to_string());

        let resolved = resolver().resolve(&dependency).await.unwrap();
        assert_eq!(resolved.resolved_by, ResolvedBy::FallbackAuthor);
        assert!(resolved.license_text.contains("Copyright (c) Jane Doe"));
    }

    #[tokio::test]
    async fn test_readme_with_crlf_line_endings() {
        let dir = TempDir::new().unwrap();
        let readme = format!(
            "# pkg\r\n\r\n## License\r\n\r\nCopyright (c) 2020 Jane\r\n\r\n{MIT_BODY}\r\n"
        );
        std::fs::write(dir.path().join("README.md"), readme).unwrap();

        let resolved = resolver()
            .resolve(&dep(dir.path(), "Unknown-XYZ"))
            .await
            .unwrap();
        assert_eq!(resolved.resolved_by, ResolvedBy::ReadmeSearch);
        assert_eq!(
            resolved.license_text,
            format!("Copyright (c) 2020 Jane\n\n{MIT_BODY}")
        );
    }

    #[tokio::test]
    async fn test_readme_heading_with_only_subheadings() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("README.md"),
            format!("# pkg\n\n## License\n\n### MIT\n\n{MIT_BODY}\n"),
        )
        .unwrap();

        match resolver().resolve(&dep(dir.path(), "Unknown-XYZ")).await {
            Err(ResolveError::MissingLicense(d)) => assert_eq!(d.name, "pkg"),
            other => panic!("expected MissingLicense, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_readme_heading_with_unrelated_text() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("README.md"),
            "## License\n\nSee the LICENSE file shipped with the source.\n",
        )
        .unwrap();
        let mut dependency = dep(dir.path(), "ISC");
        dependency.author = Some("Jane Doe".to_string());

        let resolved = resolver().resolve(&dependency).await.unwrap();
        assert_eq!(resolved.resolved_by, ResolvedBy::FallbackAuthor);
        assert!(resolved.license_text.starts_with("Copyright (c) Jane Doe\n\n"));
    }

    #[tokio::test]
    async fn test_any_spdx_identifier_falls_back_to_template() {
        let dir = TempDir::new().unwrap();
        for id in [
            "MPL-2.0",
            "Python-2.0",
            "CC-BY-4.0",
            "BSD-1-Clause",
            "Artistic-2.0",
            "LGPL-3.0-or-later",
            "GPL-3.0-only",
            "EPL-2.0",
        ] {
            let mut dependency = dep(dir.path(), id);
            dependency.author = Some("Jane Doe".to_string());

            let resolved = resolver().resolve(&dependency).await.unwrap();
            assert_eq!(resolved.resolved_by, ResolvedBy::FallbackAuthor, "{id}");
            assert!(
                resolved.license_text.starts_with("Copyright (c) Jane Doe\n\n"),
                "{id}"
            );
        }

        let mut dependency = dep(dir.path(), "MPL-2.0");
        dependency.author = Some("Jane Doe".to_string());
        let resolved = resolver().resolve(&dependency).await.unwrap();
        assert!(resolved.license_text.contains("Mozilla Public License"));
    }

    #[tokio::test]
    async fn test_mit_template_with_author() {
        let dir = TempDir::new().unwrap();
        let mut dependency = dep(dir.path(), "MIT");
        dependency.author = Some("Jane Doe".to_string());

        let resolved = resolver().resolve(&dependency).await.unwrap();
        assert_eq!(resolved.resolved_by, ResolvedBy::FallbackAuthor);
        let expected = TemplateRegistry::builtin()
            .get("MIT")
            .unwrap()
            .replace(MIT_PLACEHOLDER, "Jane Doe");
        assert_eq!(resolved.license_text, expected);
        assert!(!resolved.license_text.contains(MIT_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_cc0_with_homepage_only() {
        let dir = TempDir::new().unwrap();
        let mut dependency = dep(dir.path(), "CC0-1.0");
        dependency.homepage = Some("https://example.com".to_string());

        let resolved = resolver().resolve(&dependency).await.unwrap();
        assert_eq!(resolved.resolved_by, ResolvedBy::FallbackHomepage);
        assert_eq!(resolved.additional_text, None);
        assert_eq!(
            resolved.license_text,
            TemplateRegistry::builtin().get("CC0-1.0").unwrap()
        );
    }

    #[tokio::test]
    async fn test_unknown_license_fails() {
        let dir = TempDir::new().unwrap();
        let dependency = dep(dir.path(), "Unknown-License-XYZ");

        match resolver().resolve(&dependency).await {
            Err(ResolveError::MissingLicense(d)) => assert_eq!(*d, dependency),
            other => panic!("expected MissingLicense, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_directory_is_io_error() {
        let dependency = dep(&PathBuf::from("/definitely/not/here"), "MIT");
        assert!(matches!(
            resolver().resolve(&dependency).await,
            Err(ResolveError::Io { .. })
        ));
    }

    #[test]
    fn test_public_domain_with_author() {
        let registry = TemplateRegistry::builtin();
        let mut dependency = dep(Path::new("/p"), "Unlicense");
        dependency.author = Some("Jane Doe".to_string());

        let license = from_template(&registry, &dependency).unwrap();
        assert_eq!(license.resolved_by, ResolvedBy::FallbackAuthor);
        assert_eq!(license.text, registry.get("Unlicense").unwrap());
        assert_eq!(
            license.additional_text.as_deref(),
            Some("This software was created by Jane Doe")
        );
    }

    #[test]
    fn test_public_domain_without_evidence_gets_copyright_line() {
        let registry = TemplateRegistry::builtin();
        let license = from_template(&registry, &dep(Path::new("/p"), "MIT-0")).unwrap();
        assert_eq!(license.resolved_by, ResolvedBy::FallbackHomepage);
        assert!(license.text.starts_with("Copyright (c) The maintainers of pkg\n\nMIT No Attribution"));
    }

    #[test]
    fn test_bsd_placeholder_with_homepage() {
        let registry = TemplateRegistry::builtin();
        let mut dependency = dep(Path::new("/p"), "BSD-3-Clause");
        dependency.homepage = Some("https://pkg.dev".to_string());

        let license = from_template(&registry, &dependency).unwrap();
        assert_eq!(license.resolved_by, ResolvedBy::FallbackHomepage);
        assert!(license
            .text
            .starts_with("Copyright (c) The maintainers of pkg <https://pkg.dev>."));
    }

    #[test]
    fn test_other_license_prepends_copyright() {
        let registry = TemplateRegistry::builtin();
        let mut dependency = dep(Path::new("/p"), "ISC");
        dependency.author = Some("Jane Doe".to_string());

        let license = from_template(&registry, &dependency).unwrap();
        assert_eq!(license.resolved_by, ResolvedBy::FallbackAuthor);
        assert_eq!(
            license.text,
            format!("Copyright (c) Jane Doe\n\n{}", registry.get("ISC").unwrap())
        );
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            Strategy::ORDER,
            [Strategy::LicenseFile, Strategy::ReadmeSection, Strategy::SpdxTemplate]
        );
    }
}
