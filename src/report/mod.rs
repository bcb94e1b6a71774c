//! Renderers for resolved dependencies.
//!
//! - [`disclaimer`]: the attribution document for legal notices.
//! - [`json`]: the listing as a JSON array.
//! - [`terminal`]: colored tables of resolved and unresolved dependencies.

pub mod disclaimer;
pub mod json;
pub mod terminal;
