//! Declarative route registration from a YAML manifest.
//!
//! The manifest is the single source of truth for a deployment's route
//! table: patterns, methods, handler names, and metadata entries. Handlers
//! themselves are plain functions registered in the [`crate::dispatcher`];
//! the manifest binds them by name.

mod load;
mod types;

pub use load::{load_manifest, parse_manifest};
pub use types::{Manifest, ManifestRoute};
