use anyhow::{bail, Context};
use http::Method;

use super::types::{Manifest, ManifestRoute};
use crate::router::Route;

const SUPPORTED_METHODS: [Method; 8] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::OPTIONS,
    Method::HEAD,
    Method::TRACE,
];

/// Load a YAML route manifest from disk and build the registration list.
pub fn load_manifest(file_path: &str) -> anyhow::Result<Vec<Route>> {
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read manifest {file_path:?}"))?;
    parse_manifest(&content)
}

/// Parse a YAML route manifest into the registration list, validating each
/// entry.
pub fn parse_manifest(content: &str) -> anyhow::Result<Vec<Route>> {
    let manifest: Manifest = serde_yaml::from_str(content)?;
    manifest.routes.into_iter().map(build_route).collect()
}

fn build_route(entry: ManifestRoute) -> anyhow::Result<Route> {
    let method = parse_method(entry.method.as_deref(), &entry.path)?;
    match (entry.handler, entry.metadata) {
        (Some(handler), metadata) => {
            let mut route = Route::page(method, &entry.path, &handler)?;
            if let Some(metadata) = metadata {
                route = route.with_metadata(metadata);
            }
            Ok(route)
        }
        (None, Some(metadata)) => Route::scope(&entry.path, metadata),
        (None, None) => {
            bail!(
                "manifest entry {:?} defines neither a handler nor metadata",
                entry.path
            )
        }
    }
}

fn parse_method(method: Option<&str>, path: &str) -> anyhow::Result<Method> {
    let Some(method) = method else {
        return Ok(Method::GET);
    };
    let parsed = method
        .to_ascii_uppercase()
        .parse::<Method>()
        .with_context(|| format!("manifest entry {path:?} has invalid method {method:?}"))?;
    if !SUPPORTED_METHODS.contains(&parsed) {
        bail!("manifest entry {path:?} has unsupported method {method:?}");
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest_page_and_scope() {
        let routes = parse_manifest(
            r#"
routes:
  - path: /
    metadata:
      title_default: "Global title"
  - path: /about
    handler: about
    metadata:
      title_absolute: "About"
  - path: /profile/api
    method: get
    handler: profile_api
"#,
        )
        .unwrap();
        assert_eq!(routes.len(), 3);
        assert!(routes[0].handler_name.is_none());
        assert_eq!(routes[1].handler_name.as_deref(), Some("about"));
        assert_eq!(routes[2].method, Method::GET);
    }

    #[test]
    fn test_empty_entry_rejected() {
        let err = parse_manifest("routes:\n  - path: /nothing\n").unwrap_err();
        assert!(err.to_string().contains("neither a handler nor metadata"));
    }

    #[test]
    fn test_unsupported_method_rejected() {
        let manifest = "routes:\n  - path: /x\n    method: brew\n    handler: x\n";
        assert!(parse_manifest(manifest).is_err());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let manifest = "routes:\n  - path: /docs/{...slug}/tail\n    handler: docs\n";
        assert!(parse_manifest(manifest).is_err());
    }
}
