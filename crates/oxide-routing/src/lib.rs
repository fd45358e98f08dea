//! # oxide-routing
//!
//! Route pattern compilation and request matching.
//!
//! This crate provides:
//! - Routes with `{name}` placeholders, regex rules and default values
//! - Optional trailing segments for placeholders with a default
//! - Method, scheme and host name constraints
//! - Ordered route collections with a prefix pre-filter
//! - First-match-wins matchers for plain paths and HTTP requests
//! - JSON route tables
//!
//! ## Quick Start
//!
//! ```
//! use oxide_routing::{Request, Route, RouteCollection, Router};
//!
//! let mut articles = RouteCollection::with_prefix("/article");
//! articles
//!     .add_route(
//!         Route::builder("articles.show", "/article/{name}/{page}")
//!             .controller("ArticleController")
//!             .action("show")
//!             .rule("name", r"[\w\-]+")
//!             .rule("page", "[0-9]+")
//!             .default_value("page", "1")
//!             .method("GET")
//!             .build(),
//!     )
//!     .unwrap();
//!
//! let router = Router::new().collection(articles);
//!
//! let matched = router
//!     .match_request(&Request::get("/article/doing_unit-tests"))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(matched.route.action(), "show");
//! assert_eq!(matched.params.get("name"), Some("doing_unit-tests"));
//! assert_eq!(matched.params.get("page"), Some("1"));
//! ```
//!
//! ## Placeholders
//!
//! A placeholder only matches flexibly once it has a rule. With a default
//! value, the placeholder's segment may be left out of the request path
//! entirely and the default is reported instead:
//!
//! ```
//! use oxide_routing::{BasicRouteMatcher, Route, RouteMatcher, RoutePatternGenerator};
//!
//! let route = Route::builder("list", "/list/{page}")
//!     .rule("page", "[0-9]+")
//!     .default_value("page", "1")
//!     .build();
//!
//! let generator = RoutePatternGenerator::new();
//! let mut matcher = BasicRouteMatcher::new(&generator, "/list");
//! assert!(matcher.matches_route(&route).unwrap());
//! assert_eq!(matcher.route_parameters().unwrap().get("page"), Some("1"));
//! ```
//!
//! ## Matching order
//!
//! Collections are queried in the order they were added, and routes in the
//! order they were registered. The first route whose path, method, scheme
//! and host name all match is the result. Not matching anything is
//! `Ok(None)`, not an error.

mod collection;
pub mod config;
mod error;
mod matcher;
mod pattern;
mod request;
mod route;
mod router;

pub use collection::RouteCollection;
pub use config::RouterConfig;
pub use error::{Result, RouterError};
pub use matcher::{BasicRouteMatcher, HttpRouteMatcher, RouteMatch, RouteMatcher};
pub use pattern::{AliasTable, PathToken, RoutePatternGenerator, tokenize};
pub use request::{HttpRequestContext, Method, PathParams, Request, RequestContext};
pub use route::{PropertyConstraint, Route, RouteBuilder, WILDCARD};
pub use router::Router;
