//! Path-only matcher.

use crate::pattern::RoutePatternGenerator;
use crate::request::{PathParams, RequestContext};
use crate::route::Route;

use super::RouteMatcher;

/// Matches on the request path alone.
///
/// Method, scheme and host name constraints of a route are ignored, which
/// makes this matcher usable outside HTTP, e.g. for console commands.
///
/// # Example
///
/// ```
/// use oxide_routing::{BasicRouteMatcher, Route, RouteMatcher, RoutePatternGenerator};
///
/// let route = Route::builder("page", "/page/{num}")
///     .rule("num", "[0-9]+")
///     .build();
/// let generator = RoutePatternGenerator::new();
/// let mut matcher = BasicRouteMatcher::new(&generator, "/page/4");
///
/// assert!(matcher.matches_route(&route).unwrap());
/// assert_eq!(matcher.route_parameters().unwrap().get("num"), Some("4"));
/// ```
#[derive(Debug)]
pub struct BasicRouteMatcher<'a, R: RequestContext + ?Sized> {
    generator: &'a RoutePatternGenerator,
    request: &'a R,
    parameters: Option<PathParams>,
}

impl<'a, R: RequestContext + ?Sized> BasicRouteMatcher<'a, R> {
    /// Creates a matcher for one request.
    pub fn new(generator: &'a RoutePatternGenerator, request: &'a R) -> Self {
        Self {
            generator,
            request,
            parameters: None,
        }
    }

    /// Returns the request descriptor.
    pub fn request(&self) -> &R {
        self.request
    }
}

impl<R: RequestContext + ?Sized> RouteMatcher for BasicRouteMatcher<'_, R> {
    fn generator(&self) -> &RoutePatternGenerator {
        self.generator
    }

    fn request_path(&self) -> &str {
        self.request.path()
    }

    fn matches_properties(&self, _route: &Route) -> bool {
        true
    }

    fn store_parameters(&mut self, params: PathParams) {
        self.parameters = Some(params);
    }

    fn route_parameters(&self) -> Option<&PathParams> {
        self.parameters.as_ref()
    }
}
