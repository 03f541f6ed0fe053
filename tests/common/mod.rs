#![allow(dead_code)]

use std::sync::Once;

use leafroute::dispatcher::{Dispatcher, Outcome, Rendered};
use leafroute::metadata::MetadataEntry;
use leafroute::router::{Route, Router};
use leafroute::service::PageService;

static INIT: Once = Once::new();

/// Install a test subscriber once per process; honors `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub mod temp_files {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Creates a temporary manifest file with a guaranteed unique name.
    pub fn create_temp_manifest(content: &str) -> PathBuf {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "leafroute_test_{}_{}_{}.yaml",
            std::process::id(),
            counter,
            nanos
        ));
        std::fs::write(&path, content).unwrap();
        path
    }
}

/// A small demo site: global metadata at the
/// root, a product/review hierarchy, an about page with an absolute title,
/// and a docs catch-all.
pub fn example_service() -> PageService {
    init_tracing();

    let routes = vec![
        Route::scope(
            "/",
            MetadataEntry {
                title_default: Some("Global title".to_string()),
                title_template: None,
                title_absolute: None,
                description: Some("this is layout metadata".to_string()),
            },
        )
        .unwrap(),
        Route::get("/", "home").unwrap(),
        Route::get("/about", "about")
            .unwrap()
            .with_metadata(MetadataEntry::with_absolute_title("About")),
        Route::get("/products/{productsId}", "product_details")
            .unwrap()
            .with_metadata(MetadataEntry {
                title_default: Some("Product Details - {productsId}".to_string()),
                title_template: None,
                title_absolute: None,
                description: Some(
                    "Details and information about product {productsId}.".to_string(),
                ),
            }),
        Route::get("/products/{productsId}/review/{reviewId}", "product_review").unwrap(),
        Route::get("/articles/{articleId}", "news_article").unwrap(),
        Route::get("/docs/{...slug}", "docs").unwrap(),
        Route::get("/profile/api", "profile_api").unwrap(),
    ];
    let router = Router::new(routes);

    let mut dispatcher = Dispatcher::new();
    dispatcher.register_handler("home", |_req, _ctx| {
        Outcome::Render(Rendered::html("<h1>Hello, World!</h1>"))
    });
    dispatcher.register_handler("about", |_req, _ctx| {
        Outcome::Render(Rendered::html("<h1>About</h1>"))
    });
    dispatcher.register_handler("product_details", |req, _ctx| {
        let id = req.param("productsId").unwrap_or("?");
        Outcome::Render(Rendered::html(format!("<h1>Product details for {id}</h1>")))
    });
    dispatcher.register_handler("product_review", |req, _ctx| {
        // Product ids above 1000 do not exist; non-numeric ids never match.
        let exists = req
            .param("productsId")
            .and_then(|id| id.parse::<u64>().ok())
            .is_some_and(|id| id <= 1000);
        if !exists {
            return Outcome::NotFound;
        }
        let product = req.param("productsId").unwrap_or("?");
        let review = req.param("reviewId").unwrap_or("?");
        Outcome::Render(Rendered::html(format!(
            "<h1>Review {review} for product {product}</h1>"
        )))
    });
    dispatcher.register_handler("news_article", |req, ctx| {
        let article = req.param("articleId").unwrap_or("?");
        let lang = ctx.query_param("lang").unwrap_or("default language");
        Outcome::Render(Rendered::html(format!(
            "<h1>News article {article}</h1><p>Reading in {lang}</p>"
        )))
    });
    dispatcher.register_handler("docs", |req, _ctx| {
        let slug = req.segments("slug").unwrap_or(&[]);
        let markup = match slug {
            [] => "<h1>Docs Home Page</h1>".to_string(),
            [first] => format!("<h1>Docs Page {first}</h1>"),
            [first, second] => format!("<h1>Docs Page {first} and {second}</h1>"),
            _ => "<h1>Docs page</h1>".to_string(),
        };
        Outcome::Render(Rendered::html(markup))
    });
    dispatcher.register_handler("profile_api", |_req, ctx| {
        use leafroute::context::SetCookie;
        ctx.set_cookie(SetCookie::new("resultsPerPage", "10"));
        ctx.set_cookie(SetCookie::new("theme", "dark"));
        ctx.set_header("content-type", "text/html".to_string());
        Outcome::Render(Rendered::html("<h1>Profile API data</h1>"))
    });

    PageService::new(router, dispatcher)
}
