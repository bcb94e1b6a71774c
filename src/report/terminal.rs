use std::collections::HashMap;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::batch::BatchResolution;
use crate::models::{ResolvedBy, ResolvedDependency};

/// Render the batch as a human-readable report.
pub fn render(batch: &BatchResolution) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n {} v{}\n\n",
        "pnpm-licenses".bold(),
        env!("CARGO_PKG_VERSION")
    ));
    out.push_str(&format!(
        " Resolved: {}  Unresolved: {}  {}\n\n",
        batch.successes.len().to_string().green(),
        batch.failures.len().to_string().red(),
        summarize_strategies(&batch.successes)
    ));

    if !batch.successes.is_empty() {
        out.push_str(&resolved_table(&batch.successes).to_string());
        out.push('\n');
    }

    if !batch.failures.is_empty() {
        out.push_str(&format!(
            "\n {} Dependencies without license text:\n\n",
            "[MISSING]".red().bold()
        ));
        out.push_str(&failure_table(batch).to_string());
        out.push('\n');
    }

    out
}

fn header(columns: &[&str]) -> Vec<Cell> {
    columns
        .iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
        .collect()
}

fn resolved_table(deps: &[ResolvedDependency]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["Name", "Version", "License", "Resolved by"]));

    for dep in deps {
        let color = match dep.resolved_by {
            ResolvedBy::LicenseFile => Color::Green,
            ResolvedBy::ReadmeSearch => Color::Cyan,
            ResolvedBy::FallbackAuthor => Color::Yellow,
            ResolvedBy::FallbackHomepage => Color::DarkYellow,
        };
        table.add_row(vec![
            Cell::new(dep.name()),
            Cell::new(dep.version()),
            Cell::new(&dep.dependency.license),
            Cell::new(dep.resolved_by.to_string()).fg(color),
        ]);
    }

    table
}

fn failure_table(batch: &BatchResolution) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["Name", "Version", "License", "Reason"]));

    for failure in &batch.failures {
        let dep = &failure.dependency;
        table.add_row(vec![
            Cell::new(&dep.name),
            Cell::new(&dep.version),
            Cell::new(&dep.license),
            Cell::new(failure.error.to_string()).fg(Color::Red),
        ]);
    }

    table
}

/// `[license-file (12), fallback-author (3)]`, most frequent first.
fn summarize_strategies(deps: &[ResolvedDependency]) -> String {
    let mut counts: HashMap<ResolvedBy, usize> = HashMap::new();
    for dep in deps {
        *counts.entry(dep.resolved_by).or_insert(0) += 1;
    }

    let mut pairs: Vec<(ResolvedBy, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.to_string().cmp(&b.0.to_string())));

    let summary: Vec<String> = pairs
        .iter()
        .map(|(by, cnt)| format!("{} ({})", by, cnt))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}
