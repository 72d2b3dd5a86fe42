#![forbid(unsafe_code)]

//! Signal relationship extraction and model (headless).
//!
//! - [`extract`] scans a Python source tree for `@receiver(signal, sender=...)` bindings
//! - [`model`] groups the resulting records by sender and answers details lookups
//! - [`query`] implements the search-box matching used by both the table and the diagram

pub mod error;
pub mod extract;
pub mod geom;
pub mod model;
pub mod query;

pub use error::{Error, Result};
pub use extract::{ExtractOptions, extract};
pub use model::{Group, NodeKind, Related, RelationshipRecord, group_records, related_to};
pub use query::{Query, filter, filter_owned};

#[cfg(test)]
mod tests;
