//! HTTP-aware matcher.

use tracing::trace;

use crate::pattern::RoutePatternGenerator;
use crate::request::{HttpRequestContext, PathParams};
use crate::route::Route;

use super::RouteMatcher;

/// Matches on the request path, then on method, scheme and host name.
///
/// Method and scheme compare ASCII case-insensitively; the host name must
/// be equal. A wildcard constraint accepts any value.
#[derive(Debug)]
pub struct HttpRouteMatcher<'a, R: HttpRequestContext + ?Sized> {
    generator: &'a RoutePatternGenerator,
    request: &'a R,
    parameters: Option<PathParams>,
}

impl<'a, R: HttpRequestContext + ?Sized> HttpRouteMatcher<'a, R> {
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

impl<R: HttpRequestContext + ?Sized> RouteMatcher for HttpRouteMatcher<'_, R> {
    fn generator(&self) -> &RoutePatternGenerator {
        self.generator
    }

    fn request_path(&self) -> &str {
        self.request.path()
    }

    fn matches_properties(&self, route: &Route) -> bool {
        let checks = [
            ("method", route.method().accepts(self.request.method(), true)),
            ("scheme", route.scheme().accepts(self.request.scheme(), true)),
            ("hostname", route.hostname().accepts(self.request.hostname(), false)),
        ];

        checks.into_iter().all(|(property, accepted)| {
            if !accepted {
                trace!(route = route.name(), property, "request property mismatch");
            }
            accepted
        })
    }

    fn store_parameters(&mut self, params: PathParams) {
        self.parameters = Some(params);
    }

    fn route_parameters(&self) -> Option<&PathParams> {
        self.parameters.as_ref()
    }
}
