use crate::models::ResolvedDependency;

pub const HEADER: &str = "THE FOLLOWING SETS FORTH ATTRIBUTION NOTICES FOR THIRD PARTY SOFTWARE THAT MAY BE CONTAINED IN PORTIONS OF THIS PRODUCT";

pub const SEPARATOR: &str = "\n\n---\n\n";

/// Assemble the attribution document for `deps`, one block per dependency
/// in input order.
pub fn generate(deps: &[ResolvedDependency]) -> String {
    let blocks: Vec<String> = deps.iter().map(block).collect();
    format!("{HEADER}\n\n{}", blocks.join(SEPARATOR))
}

fn block(dep: &ResolvedDependency) -> String {
    let mut notice = vec![format!(
        "The following software may be included in this product: {} ({})",
        dep.name(),
        dep.version()
    )];
    if let Some(additional) = dep.additional_text.as_deref().filter(|t| !t.is_empty()) {
        notice.push(additional.to_string());
    }
    notice.push("This software contains the following license and notice below:".to_string());

    format!("{}\n\n{}", notice.join("\n"), dep.license_text)
}
