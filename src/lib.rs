//! `pnpm-licenses`: find the license text that applies to every dependency of
//! a pnpm project and assemble attribution disclaimers.
//!
//! # Flow
//! 1. Enumerate dependencies from `pnpm licenses list --json` ([`analyzer`]).
//! 2. Drop dependencies matching the name filters ([`filter`]).
//! 3. Resolve every dependency's license text concurrently ([`batch`]), each
//!    one through the strategy chain in [`license::resolver`].
//! 4. Render the successes as a listing or a disclaimer ([`report`]).

pub mod analyzer;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod license;
pub mod models;
pub mod output;
pub mod report;

pub use batch::{resolve_all, BatchResolution};
pub use error::{InputError, ResolveError};
pub use license::resolver::LicenseTextResolver;
pub use license::spdx::TemplateRegistry;
pub use models::{Dependency, ResolvedBy, ResolvedDependency};
pub use report::disclaimer::generate as generate_disclaimer;
