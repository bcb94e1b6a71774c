use std::path::PathBuf;

use thiserror::Error;

use crate::models::Dependency;

/// Why a single dependency could not be resolved to a license text.
///
/// Every variant is terminal for that dependency only; the batch resolver
/// collects them into its failure list.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No license text found for dependency {}", .0.name)]
    MissingLicense(Box<Dependency>),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid built-in pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ResolveError {
    pub fn missing(dependency: &Dependency) -> Self {
        ResolveError::MissingLicense(Box::new(dependency.clone()))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResolveError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while reading and validating the dependency listing.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("pnpm reported an error: {code} - {message}")]
    Pnpm { code: String, message: String },

    #[error("Failed to parse input, received the following:\n{input}\n\nThe error was: {details}")]
    Schema { input: String, details: String },

    #[error("Package {name} lists {versions} versions but {paths} paths")]
    MismatchedPaths {
        name: String,
        versions: usize,
        paths: usize,
    },

    #[error("Invalid value for filter flag, expected an array of strings encoded as JSON but received:\n{0}")]
    FilterJson(String),

    #[error("Invalid glob pattern {pattern:?}: {details}")]
    FilterPattern { pattern: String, details: String },

    #[error("`{command}` failed: {details}\nstdout: {stdout}\nstderr: {stderr}")]
    Command {
        command: String,
        details: String,
        stdout: String,
        stderr: String,
    },
}
