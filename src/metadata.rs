//! Route metadata resolution.
//!
//! Every route-tree node may carry a [`MetadataEntry`]. When a request
//! matches, the entries along the chain from the root node down to the
//! matched node are folded into a single [`PageMetadata`], so child routes
//! inherit and may override ancestor titles and descriptions.
//!
//! Title resolution follows the layered convention:
//!
//! - `title_absolute` replaces the running title outright and ignores any
//!   ancestor template or default from that point on,
//! - `title_template` substitutes the running title into its single `%s`
//!   placeholder,
//! - `title_default` replaces the running title wholesale.
//!
//! The description is always overridden wholesale by the nearest entry that
//! defines one; there is no description templating.
//!
//! The first entry in a chain seeds the running title from its absolute or
//! default title; a template on that entry is reserved for descendants and
//! never self-applied.

use serde::{Deserialize, Serialize};

use crate::router::{ParamValue, ParamVec};

/// Placeholder in `title_template` that receives the inherited title.
pub const TITLE_PLACEHOLDER: &str = "%s";

/// Metadata attached to one route-tree node. Immutable once registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Title used when no descendant overrides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_default: Option<String>,
    /// Template applied to the inherited title, e.g. `"%s | My Website"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_template: Option<String>,
    /// Exact title; short-circuits inheritance entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_absolute: Option<String>,
    /// Page description; overridden wholesale by the nearest definer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MetadataEntry {
    /// Entry with only a default title.
    #[must_use]
    pub fn with_default_title(title: &str) -> Self {
        Self {
            title_default: Some(title.to_string()),
            ..Self::default()
        }
    }

    /// Entry with only an absolute title.
    #[must_use]
    pub fn with_absolute_title(title: &str) -> Self {
        Self {
            title_absolute: Some(title.to_string()),
            ..Self::default()
        }
    }

    /// Substitute `{param}` references in every field with the matched path
    /// parameter values, so entries like `title_default: "Product {productsId}"`
    /// resolve per request. Multi-valued (catch-all) parameters join with `/`.
    #[must_use]
    pub fn interpolate(&self, params: &ParamVec) -> Self {
        let subst = |field: &Option<String>| {
            field.as_ref().map(|text| {
                let mut out = text.clone();
                for (name, value) in params {
                    let needle = format!("{{{}}}", name);
                    if out.contains(&needle) {
                        let rendered = match value {
                            ParamValue::Single(v) => v.clone(),
                            ParamValue::Multi(vs) => vs.join("/"),
                        };
                        out = out.replace(&needle, &rendered);
                    }
                }
                out
            })
        };
        Self {
            title_default: subst(&self.title_default),
            title_template: subst(&self.title_template),
            title_absolute: subst(&self.title_absolute),
            description: subst(&self.description),
        }
    }
}

/// The resolved title/description pair for a matched route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    /// Effective page title; empty string when nothing along the chain
    /// defines one.
    pub title: String,
    /// Effective description, if any entry along the chain defines one.
    pub description: Option<String>,
}

impl PageMetadata {
    /// Apply a single entry's rule to the running result. Folding a chain
    /// root-to-leaf with this step function is associative: resolving a
    /// prefix and then applying the remaining entries yields the same result
    /// as resolving the whole chain at once.
    #[must_use]
    pub fn apply(mut self, entry: &MetadataEntry) -> Self {
        if let Some(absolute) = &entry.title_absolute {
            self.title = absolute.clone();
        } else if let Some(template) = &entry.title_template {
            self.title = template.replacen(TITLE_PLACEHOLDER, &self.title, 1);
        } else if let Some(default) = &entry.title_default {
            self.title = default.clone();
        }
        if let Some(description) = &entry.description {
            self.description = Some(description.clone());
        }
        self
    }
}

// The chain's first entry seeds the result: its absolute or default title
// starts the inheritance, and its template (if any) is reserved for
// descendants rather than self-applied to the empty title.
fn seed(entry: &MetadataEntry) -> PageMetadata {
    PageMetadata {
        title: entry
            .title_absolute
            .as_ref()
            .or(entry.title_default.as_ref())
            .cloned()
            .unwrap_or_default(),
        description: entry.description.clone(),
    }
}

/// Fold the metadata entries along a root-to-leaf chain into the effective
/// page metadata. Deterministic and total: an empty chain yields an empty
/// title and no description.
#[must_use]
pub fn resolve<'a, I>(chain: I) -> PageMetadata
where
    I: IntoIterator<Item = &'a MetadataEntry>,
{
    let mut entries = chain.into_iter();
    let Some(first) = entries.next() else {
        return PageMetadata::default();
    };
    entries.fold(seed(first), PageMetadata::apply)
}

/// [`resolve`], with `{param}` references substituted from the match result
/// before each entry is applied.
#[must_use]
pub fn resolve_with_params<'a, I>(chain: I, params: &ParamVec) -> PageMetadata
where
    I: IntoIterator<Item = &'a MetadataEntry>,
{
    let mut entries = chain.into_iter();
    let Some(first) = entries.next() else {
        return PageMetadata::default();
    };
    entries.fold(seed(&first.interpolate(params)), |acc, entry| {
        acc.apply(&entry.interpolate(params))
    })
}
