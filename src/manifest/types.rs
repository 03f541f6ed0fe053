use serde::Deserialize;

use crate::metadata::MetadataEntry;

/// Top-level route manifest document.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Registration list, in order.
    pub routes: Vec<ManifestRoute>,
}

/// One manifest entry. An entry with a `handler` registers a page route; an
/// entry with only `metadata` registers a scope that decorates descendants.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestRoute {
    /// Route pattern, e.g. `/products/{productsId}`.
    pub path: String,
    /// HTTP method; defaults to GET.
    #[serde(default)]
    pub method: Option<String>,
    /// Handler name to bind in the dispatcher.
    #[serde(default)]
    pub handler: Option<String>,
    /// Metadata attached to the route's tree node.
    #[serde(default)]
    pub metadata: Option<MetadataEntry>,
}
