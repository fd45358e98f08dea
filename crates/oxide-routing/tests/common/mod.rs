#![allow(dead_code)]

use oxide_routing::{Method, Request, Route, RouteCollection};

/// The article route used throughout the matching tests.
pub fn article_route() -> Route {
    Route::builder("articles.show", "/article/{name}/{page}")
        .controller("ArticleController")
        .action("show")
        .rule("name", r"[\w\-]+")
        .rule("page", "[0-9]+")
        .default_value("page", "1")
        .method("GET")
        .scheme("https")
        .hostname("example.org")
        .build()
}

/// A request to `example.org` over HTTPS.
pub fn request(method: Method, path: &str) -> Request {
    Request::new(method, path)
        .with_scheme("https")
        .with_hostname("example.org")
}

/// Builds a collection from routes, panicking on duplicates.
pub fn collection(prefix: &str, routes: Vec<Route>) -> RouteCollection {
    let mut collection = RouteCollection::with_prefix(prefix);
    collection
        .add_routes(routes)
        .unwrap_or_else(|e| panic!("Failed to build collection: {e}"));
    collection
}
