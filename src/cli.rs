use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::analyzer::DependencySource;

#[derive(Parser, Debug)]
#[command(
    name = "pnpm-licenses",
    about = "Resolve the license texts of pnpm dependencies and generate attribution disclaimers",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all dependencies and their licenses
    List {
        #[command(flatten)]
        common: CommonArgs,

        /// Report format
        #[arg(long, default_value = "json", value_name = "FORMAT")]
        report: ReportFormat,
    },

    /// Generate a disclaimer for all dependencies
    GenerateDisclaimer {
        #[command(flatten)]
        common: CommonArgs,
    },
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::List { common, .. } | Command::GenerateDisclaimer { common } => common,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Project directory pnpm is run in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Only consider production dependencies
    #[arg(short, long)]
    pub prod: bool,

    /// Read input from stdin as json, instead of calling pnpm ourselves
    #[arg(long, conflicts_with = "json_input_file")]
    pub json_input: bool,

    /// Read input from a (json) file, instead of calling pnpm ourselves or reading from stdin
    #[arg(short = 'i', long, value_name = "FILE")]
    pub json_input_file: Option<PathBuf>,

    /// Output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Filter out dependencies via glob patterns, as a JSON array.
    /// Example: --filter='["@quantco/*", "@pnpm/*"]' or
    /// --filter='["**", "!@quantco/*", "!@pnpm/*"]' (inverted match)
    #[arg(short, long, value_name = "JSON")]
    pub filter: Option<String>,

    /// Config file [default: ./.pnpm-licenses/config.toml, fallback ~/.config/pnpm-licenses/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Exit with status 1 if any dependency has no license text
    #[arg(long)]
    pub fail_on_missing: bool,

    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl CommonArgs {
    pub fn source(&self) -> DependencySource {
        if self.json_input {
            DependencySource::Stdin
        } else if let Some(path) = &self.json_input_file {
            DependencySource::File(path.clone())
        } else {
            DependencySource::Pnpm { prod: self.prod }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Json,
    Terminal,
}
