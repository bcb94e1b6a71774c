use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Licenses for which a "Copyright (c) ..." line makes no sense.
pub const PUBLIC_DOMAIN_LIKE: &[&str] = &["WTFPL", "CC0-1.0", "Unlicense", "MIT-0"];

/// Copyright placeholder in the MIT template.
pub const MIT_PLACEHOLDER: &str = "<year> <copyright holders>";

/// Copyright placeholder in the BSD-2-Clause and BSD-3-Clause templates.
pub const BSD_PLACEHOLDER: &str = "<year> <owner>";

/// Copies shipped with the crate. They take precedence over the SPDX list so
/// the placeholders above stay exactly as [`from_template`] expects them.
///
/// [`from_template`]: crate::license::resolver::from_template
const BUNDLED_TEMPLATES: &[(&str, &str)] = &[
    ("0BSD", include_str!("../../licenses/0BSD.txt")),
    ("Apache-2.0", include_str!("../../licenses/Apache-2.0.txt")),
    ("BSD-2-Clause", include_str!("../../licenses/BSD-2-Clause.txt")),
    ("BSD-3-Clause", include_str!("../../licenses/BSD-3-Clause.txt")),
    ("BlueOak-1.0.0", include_str!("../../licenses/BlueOak-1.0.0.txt")),
    ("CC0-1.0", include_str!("../../licenses/CC0-1.0.txt")),
    ("ISC", include_str!("../../licenses/ISC.txt")),
    ("MIT", include_str!("../../licenses/MIT.txt")),
    ("MIT-0", include_str!("../../licenses/MIT-0.txt")),
    ("Unlicense", include_str!("../../licenses/Unlicense.txt")),
    ("WTFPL", include_str!("../../licenses/WTFPL.txt")),
    ("Zlib", include_str!("../../licenses/Zlib.txt")),
];

pub fn is_public_domain_like(id: &str) -> bool {
    PUBLIC_DOMAIN_LIKE.contains(&id)
}

/// Canonical license texts keyed by SPDX identifier.
///
/// Built once at startup and shared read-only between resolutions.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, String>,
}

impl TemplateRegistry {
    /// Every license text on the SPDX list, with the bundled copies on top.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for (id, text) in ::spdx::text::LICENSE_TEXTS {
            registry.insert(*id, *text);
        }
        for (id, text) in BUNDLED_TEMPLATES {
            registry.insert(*id, *text);
        }
        registry
    }

    /// Built-in templates plus every `<SPDX-ID>.txt` file in `extra_dir`.
    /// Files in `extra_dir` replace built-in templates of the same id.
    pub fn load(extra_dir: Option<&Path>) -> Result<Self> {
        let mut registry = Self::builtin();

        let Some(dir) = extra_dir else {
            return Ok(registry);
        };

        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read template directory {}", dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template {}", path.display()))?;
            debug!(id, path = %path.display(), "loaded license template");
            registry.insert(id, text);
        }

        Ok(registry)
    }

    pub fn insert(&mut self, id: impl Into<String>, text: impl AsRef<str>) {
        self.templates
            .insert(id.into(), text.as_ref().trim().to_string());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.templates.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
