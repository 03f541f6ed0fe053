mod common;

use leafroute::metadata::{resolve, resolve_with_params, MetadataEntry};
use leafroute::pattern::RoutePattern;
use leafroute::router::{Route, Router};

fn entry(default: Option<&str>, template: Option<&str>, absolute: Option<&str>) -> MetadataEntry {
    MetadataEntry {
        title_default: default.map(str::to_string),
        title_template: template.map(str::to_string),
        title_absolute: absolute.map(str::to_string),
        description: None,
    }
}

#[test]
fn test_chain_walks_root_to_leaf() {
    common::init_tracing();
    let routes = vec![
        Route::scope("/", entry(Some("Global title"), None, None)).unwrap(),
        Route::scope("/products", entry(None, Some("%s | Products"), None)).unwrap(),
        Route::get("/products/{productsId}", "product").unwrap(),
    ];
    let router = Router::new(routes);

    let pattern = RoutePattern::parse("/products/{productsId}").unwrap();
    let chain = router.metadata_chain(&pattern);
    let resolved = resolve(chain);
    assert_eq!(resolved.title, "Global title | Products");
}

#[test]
fn test_absolute_overrides_ancestor_template() {
    common::init_tracing();
    let routes = vec![
        Route::scope("/", entry(Some("Global title"), Some("%s | My Website"), None)).unwrap(),
        Route::get("/about", "about")
            .unwrap()
            .with_metadata(entry(None, None, Some("About"))),
        Route::get("/profile", "profile").unwrap(),
    ];
    let router = Router::new(routes);

    let about = RoutePattern::parse("/about").unwrap();
    let resolved = resolve(router.metadata_chain(&about));
    assert_eq!(resolved.title, "About");

    // A metadata-less sibling inherits the root default untouched.
    let profile = RoutePattern::parse("/profile").unwrap();
    let resolved = resolve(router.metadata_chain(&profile));
    assert_eq!(resolved.title, "Global title");
}

#[test]
fn test_deeper_absolute_beats_shallower_absolute() {
    let chain = [
        entry(Some("Root"), None, None),
        entry(None, None, Some("Section")),
        entry(None, None, Some("Leaf")),
    ];
    let resolved = resolve(chain.iter());
    assert_eq!(resolved.title, "Leaf");
}

#[test]
fn test_template_below_absolute_still_applies() {
    // The absolute short-circuits everything above it, but a strictly
    // deeper template still wraps that absolute value.
    let chain = [
        entry(Some("Root"), None, None),
        entry(None, None, Some("Docs")),
        entry(None, Some("%s / Reference"), None),
    ];
    let resolved = resolve(chain.iter());
    assert_eq!(resolved.title, "Docs / Reference");
}

#[test]
fn test_description_overridden_wholesale() {
    let mut root = entry(Some("Global title"), None, None);
    root.description = Some("this is layout metadata".to_string());
    let mut leaf = entry(None, None, None);
    leaf.description = Some("Details and information.".to_string());

    let resolved = resolve([&root, &leaf]);
    assert_eq!(
        resolved.description.as_deref(),
        Some("Details and information.")
    );

    // No descendant defines one: the root's description flows through.
    let resolved = resolve([&root, &entry(None, None, None)]);
    assert_eq!(
        resolved.description.as_deref(),
        Some("this is layout metadata")
    );
}

#[test]
fn test_associativity_along_the_chain() {
    let a = entry(Some("Global title"), None, None);
    let b = entry(None, Some("%s | Site"), None);
    let c = entry(Some("Leaf"), None, None);

    let whole = resolve([&a, &b, &c]);
    let prefix = resolve([&a, &b]);
    assert_eq!(whole, prefix.apply(&c));
}

#[test]
fn test_params_interpolate_into_generated_metadata() {
    common::init_tracing();
    let routes = vec![Route::get("/products/{productsId}", "product")
        .unwrap()
        .with_metadata(MetadataEntry {
            title_default: Some("Product Details - {productsId}".to_string()),
            title_template: None,
            title_absolute: None,
            description: Some("Details and information about product {productsId}.".to_string()),
        })];
    let router = Router::new(routes);

    let m = router.route(&http::Method::GET, "/products/42").unwrap();
    let chain = router.metadata_chain(&m.route.pattern);
    let resolved = resolve_with_params(chain, &m.params);
    assert_eq!(resolved.title, "Product Details - 42");
    assert_eq!(
        resolved.description.as_deref(),
        Some("Details and information about product 42.")
    );
}

#[test]
fn test_resolution_is_idempotent() {
    let chain = [
        entry(Some("Global title"), None, None),
        entry(None, Some("%s | My Website"), None),
    ];
    assert_eq!(resolve(chain.iter()), resolve(chain.iter()));
}
