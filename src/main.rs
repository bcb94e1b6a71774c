//! `pnpm-licenses` command-line entry point.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and set up logging.
//! 2. Load config ([`config::load_config`]) and the license template registry.
//! 3. Read the dependency listing ([`analyzer::load_dependencies`]) and apply filters.
//! 4. Resolve license texts for every dependency ([`batch::resolve_all_with`]).
//! 5. Write the listing or the disclaimer ([`report`], [`output`]).
//! 6. Exit `1` on unresolved dependencies when `--fail-on-missing` is set.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pnpm_licenses::analyzer::load_dependencies;
use pnpm_licenses::batch::{resolve_all_with, BatchResolution};
use pnpm_licenses::cli::{Cli, Command, CommonArgs, ReportFormat};
use pnpm_licenses::config::load_config;
use pnpm_licenses::filter::NameFilter;
use pnpm_licenses::output::OutputTarget;
use pnpm_licenses::report;
use pnpm_licenses::{LicenseTextResolver, TemplateRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let common = cli.command.common().clone();

    setup_logging(common.verbose, common.quiet);

    // Resolve project path
    let path = common
        .path
        .canonicalize()
        .unwrap_or_else(|_| common.path.clone());

    let config = load_config(&path, common.config.as_deref())?;
    let templates = TemplateRegistry::load(config.resolve.templates_dir.as_deref())?;
    info!(templates = templates.len(), "loaded license templates");

    let mut filter = NameFilter::new(&config.filter.patterns)?;
    if let Some(json) = &common.filter {
        filter.extend(NameFilter::from_json(json)?);
    }

    let all_deps = load_dependencies(&common.source(), &path).await?;
    let total = all_deps.len();
    let deps = filter.apply(all_deps);
    info!(total, selected = deps.len(), "loaded dependencies");

    let resolver = LicenseTextResolver::new(Arc::new(templates));
    let batch = resolve(&resolver, &deps, config.resolve.concurrency, common.quiet).await;

    let rendered = match &cli.command {
        Command::List { report: format, .. } => match format {
            ReportFormat::Json => report::json::render(&batch.successes)?,
            ReportFormat::Terminal => report::terminal::render(&batch),
        },
        Command::GenerateDisclaimer { .. } => report::disclaimer::generate(&batch.successes),
    };

    OutputTarget::from_option(common.output_file.as_deref())
        .write(&rendered)
        .await?;

    let terminal_report = matches!(
        cli.command,
        Command::List {
            report: ReportFormat::Terminal,
            ..
        }
    );
    if !terminal_report {
        warn_unresolved(&batch, &common);
    }

    if common.fail_on_missing && !batch.failures.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

async fn resolve(
    resolver: &LicenseTextResolver,
    deps: &[pnpm_licenses::Dependency],
    concurrency: usize,
    quiet: bool,
) -> BatchResolution {
    let pb = if !quiet {
        let pb = ProgressBar::new(deps.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    } else {
        None
    };

    let mut unresolved = 0;
    let batch = resolve_all_with(resolver, deps, concurrency, |outcome| {
        if !outcome.is_success() {
            unresolved += 1;
        }
        if let Some(pb) = &pb {
            if unresolved > 0 {
                pb.set_message(format!("{unresolved} unresolved"));
            }
            pb.inc(1);
        }
    })
    .await;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    batch
}

fn warn_unresolved(batch: &BatchResolution, common: &CommonArgs) {
    if common.quiet || batch.failures.is_empty() {
        return;
    }

    eprintln!(
        "{} No license text found for {} dependencies:",
        "warning:".yellow().bold(),
        batch.failures.len()
    );
    for failure in &batch.failures {
        let dep = &failure.dependency;
        eprintln!(
            "  {} {}@{} ({}): {}",
            "✗".red(),
            dep.name,
            dep.version,
            dep.license,
            failure.error
        );
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if quiet {
            "error"
        } else {
            match verbose {
                0 => "warn",
                1 => "debug",
                _ => "trace",
            }
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
