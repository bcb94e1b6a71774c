use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tokio::process::Command;
use tracing::debug;

use crate::error::InputError;
use crate::models::Dependency;

/// Package entry of `pnpm licenses list --json`.
///
/// pnpm 9 groups every installed version of a package into one entry;
/// older releases emit one entry per version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PnpmPackage {
    Grouped {
        #[serde(flatten)]
        meta: PackageMeta,
        versions: Vec<String>,
        paths: Vec<PathBuf>,
    },
    Flattened {
        #[serde(flatten)]
        meta: PackageMeta,
        version: String,
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct PackageMeta {
    name: String,
    license: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PnpmErrorBody {
    code: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct PnpmErrorEnvelope {
    error: PnpmErrorBody,
}

impl PackageMeta {
    fn into_dependency(self, version: String, path: PathBuf) -> Dependency {
        Dependency {
            name: self.name,
            version,
            path,
            license: self.license,
            author: self.author,
            homepage: self.homepage,
            description: self.description,
        }
    }
}

impl PnpmPackage {
    fn flatten(self) -> Result<Vec<Dependency>, InputError> {
        match self {
            PnpmPackage::Flattened {
                meta,
                version,
                path,
            } => Ok(vec![meta.into_dependency(version, path)]),
            PnpmPackage::Grouped {
                meta,
                versions,
                paths,
            } => {
                if versions.len() != paths.len() {
                    return Err(InputError::MismatchedPaths {
                        name: meta.name,
                        versions: versions.len(),
                        paths: paths.len(),
                    });
                }
                Ok(versions
                    .into_iter()
                    .zip(paths)
                    .map(|(version, path)| meta.clone().into_dependency(version, path))
                    .collect())
            }
        }
    }
}

fn schema_error(input: &Value, details: impl ToString) -> InputError {
    InputError::Schema {
        input: serde_json::to_string_pretty(input).unwrap_or_else(|_| input.to_string()),
        details: details.to_string(),
    }
}

/// Parse the output of `pnpm licenses list --json` into one [`Dependency`]
/// per installed package version, keeping the order pnpm listed them in.
pub fn parse_pnpm_json(content: &str) -> Result<Vec<Dependency>, InputError> {
    let json: Value = serde_json::from_str(content).map_err(|e| InputError::Schema {
        input: content.to_string(),
        details: e.to_string(),
    })?;

    // pnpm reports its own failures as `{"error": {"code", "message"}}`
    if let Ok(envelope) = serde_json::from_value::<PnpmErrorEnvelope>(json.clone()) {
        return Err(InputError::Pnpm {
            code: envelope.error.code,
            message: envelope.error.message,
        });
    }

    let Some(groups) = json.as_object() else {
        return Err(schema_error(&json, "expected an object mapping licenses to packages"));
    };

    let mut deps = Vec::new();
    for (license, packages) in groups {
        let packages: Vec<PnpmPackage> = serde_json::from_value(packages.clone())
            .map_err(|e| schema_error(&json, format!("{license}: {e}")))?;
        for package in packages {
            deps.extend(package.flatten()?);
        }
    }

    Ok(deps)
}

/// Run `pnpm licenses list --json` in `project` and return its stdout.
pub async fn run_pnpm(project: &Path, prod: bool) -> Result<String, InputError> {
    let mut args = vec!["licenses", "list", "--json"];
    if prod {
        args.push("--prod");
    }
    let command = format!("pnpm {}", args.join(" "));
    debug!(%command, project = %project.display(), "enumerating dependencies");

    let output = Command::new("pnpm")
        .args(&args)
        .current_dir(project)
        .output()
        .await
        .map_err(|e| InputError::Command {
            command: command.clone(),
            details: e.to_string(),
            stdout: String::new(),
            stderr: String::new(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
        // pnpm prints its JSON error envelope on stdout, which is more useful
        // than the exit status alone
        if let Err(err @ InputError::Pnpm { .. }) = parse_pnpm_json(&stdout) {
            return Err(err);
        }
        return Err(InputError::Command {
            command,
            details: output.status.to_string(),
            stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(stdout)
}
