use anyhow::Result;

use crate::models::ResolvedDependency;

/// Pretty-printed JSON array of resolved dependencies.
pub fn render(deps: &[ResolvedDependency]) -> Result<String> {
    Ok(serde_json::to_string_pretty(deps)?)
}
