//! License-text resolution for a single dependency.
//!
//! - [`resolver`]: the ordered strategy chain (license file, README section,
//!   SPDX template) behind [`LicenseTextResolver`](resolver::LicenseTextResolver).
//! - [`patterns`]: license/README filename patterns and full-text fingerprints.
//! - [`spdx`]: the read-only registry of canonical license templates.
//! - [`text`]: indentation and markdown clean-up.

pub mod patterns;
pub mod resolver;
pub mod spdx;
pub mod text;
