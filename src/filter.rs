//! Glob filters on dependency names.

use glob::{MatchOptions, Pattern};

use crate::error::InputError;
use crate::models::Dependency;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Set of glob patterns selecting dependencies to leave out.
///
/// A name is excluded when it matches a positive pattern and no `!` pattern.
/// With only `!` patterns every name that matches none of them is excluded,
/// so `["!@scope/*"]` keeps just the scope.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    include: Vec<Pattern>,
    negate: Vec<Pattern>,
}

impl NameFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, InputError> {
        let mut filter = Self::default();
        for raw in patterns {
            let raw = raw.as_ref();
            let (negated, glob) = match raw.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, raw),
            };
            let pattern = Pattern::new(glob).map_err(|e| InputError::FilterPattern {
                pattern: raw.to_string(),
                details: e.to_string(),
            })?;
            if negated {
                filter.negate.push(pattern);
            } else {
                filter.include.push(pattern);
            }
        }
        Ok(filter)
    }

    /// Parse the `--filter` flag value, a JSON array of glob strings.
    pub fn from_json(value: &str) -> Result<Self, InputError> {
        let patterns: Vec<String> =
            serde_json::from_str(value).map_err(|_| InputError::FilterJson(value.to_string()))?;
        Self::new(&patterns)
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.negate.is_empty()
    }

    pub fn extend(&mut self, other: NameFilter) {
        self.include.extend(other.include);
        self.negate.extend(other.negate);
    }

    pub fn excludes(&self, name: &str) -> bool {
        if self.is_empty() {
            return false;
        }
        let selected = self.include.is_empty()
            || self.include.iter().any(|p| p.matches_with(name, MATCH_OPTIONS));
        selected && !self.negate.iter().any(|p| p.matches_with(name, MATCH_OPTIONS))
    }

    pub fn apply(&self, deps: Vec<Dependency>) -> Vec<Dependency> {
        deps.into_iter().filter(|d| !self.excludes(&d.name)).collect()
    }
}
