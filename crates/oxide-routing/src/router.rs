//! Main router implementation.

use tracing::{debug, info};

use crate::collection::RouteCollection;
use crate::error::{Result, RouterError};
use crate::matcher::{BasicRouteMatcher, HttpRouteMatcher, RouteMatch, RouteMatcher};
use crate::pattern::{AliasTable, RoutePatternGenerator};
use crate::request::HttpRequestContext;
use crate::route::Route;

/// A frozen route table.
///
/// Collections are added during the build phase; matching only needs `&self`
/// so one router can serve many threads.
#[derive(Debug, Default)]
pub struct Router {
    /// Collections in query order.
    collections: Vec<RouteCollection>,
    /// Compiles and caches route patterns.
    generator: RoutePatternGenerator,
}

impl Router {
    /// Creates an empty router without aliases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty router with a path alias table.
    pub fn with_aliases(aliases: AliasTable) -> Self {
        Self {
            collections: Vec::new(),
            generator: RoutePatternGenerator::with_aliases(aliases),
        }
    }

    /// Adds a collection; collections are queried in the order added.
    #[must_use]
    pub fn collection(mut self, collection: RouteCollection) -> Self {
        self.collections.push(collection);
        self
    }

    /// Adds a collection.
    pub fn add_collection(&mut self, collection: RouteCollection) {
        self.collections.push(collection);
    }

    /// Returns the collections in query order.
    pub fn collections(&self) -> &[RouteCollection] {
        &self.collections
    }

    /// Returns the pattern generator.
    pub fn generator(&self) -> &RoutePatternGenerator {
        &self.generator
    }

    /// Returns the total number of routes.
    pub fn len(&self) -> usize {
        self.collections.iter().map(RouteCollection::len).sum()
    }

    /// Returns `true` if no route is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a route by name in the first collection that has it.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::RouteNotFound`] if no collection has the name.
    pub fn route(&self, name: &str) -> Result<&Route> {
        self.collections
            .iter()
            .find_map(|c| c.get_route(name).ok())
            .ok_or_else(|| RouterError::RouteNotFound(name.to_string()))
    }

    /// Compiles every route pattern up front.
    ///
    /// Call once after the build phase to surface invalid rules at startup
    /// rather than on the first request.
    ///
    /// # Errors
    ///
    /// Returns the first [`RouterError::InvalidRule`] encountered.
    pub fn validate(&self) -> Result<usize> {
        let mut compiled = 0;
        for route in self.collections.iter().flat_map(RouteCollection::routes) {
            self.generator.compile(route)?;
            compiled += 1;
        }
        info!(routes = compiled, "route table compiled");
        Ok(compiled)
    }

    /// Matches a bare path, ignoring HTTP constraints.
    ///
    /// # Errors
    ///
    /// Propagates compilation and consistency errors; no match is `Ok(None)`.
    pub fn match_path(&self, path: &str) -> Result<Option<RouteMatch<'_>>> {
        let result = BasicRouteMatcher::new(&self.generator, path).find(&self.collections)?;
        if result.is_none() {
            debug!(path, "no route matched");
        }
        Ok(result)
    }

    /// Matches an HTTP request.
    ///
    /// # Errors
    ///
    /// Propagates compilation and consistency errors; no match is `Ok(None)`.
    pub fn match_request<R>(&self, request: &R) -> Result<Option<RouteMatch<'_>>>
    where
        R: HttpRequestContext + ?Sized,
    {
        let result = HttpRouteMatcher::new(&self.generator, request).find(&self.collections)?;
        if result.is_none() {
            debug!(
                method = request.method(),
                path = request.path(),
                "no route matched"
            );
        }
        Ok(result)
    }
}
