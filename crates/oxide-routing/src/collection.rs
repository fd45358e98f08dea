//! Ordered route collections.

use std::collections::HashMap;

use crate::error::{Result, RouterError};
use crate::route::Route;

/// An ordered, name-keyed group of routes.
///
/// Registration order is match priority. An optional path prefix lets
/// matchers reject the whole collection before testing any route.
#[derive(Debug, Clone, Default)]
pub struct RouteCollection {
    prefix: Option<String>,
    routes: Vec<Route>,
    index: HashMap<String, usize>,
}

impl RouteCollection {
    /// Creates an empty collection without prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collection scoped under `prefix`.
    ///
    /// An empty prefix means no prefix filter.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: (!prefix.is_empty()).then_some(prefix),
            ..Self::default()
        }
    }

    /// Adds a route.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateRoute`] if a route with the same name
    /// is already registered.
    pub fn add_route(&mut self, route: Route) -> Result<()> {
        if self.index.contains_key(route.name()) {
            return Err(RouterError::DuplicateRoute(route.name().to_string()));
        }
        self.index.insert(route.name().to_string(), self.routes.len());
        self.routes.push(route);
        Ok(())
    }

    /// Adds routes in order.
    ///
    /// Routes before a duplicate stay registered.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateRoute`] on the first name collision.
    pub fn add_routes(&mut self, routes: impl IntoIterator<Item = Route>) -> Result<()> {
        routes.into_iter().try_for_each(|route| self.add_route(route))
    }

    /// Adds a route, builder style.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateRoute`] on a name collision.
    pub fn route(mut self, route: Route) -> Result<Self> {
        self.add_route(route)?;
        Ok(self)
    }

    /// Returns `true` if a route with this name is registered.
    pub fn has_route(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Looks up a route by name.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::RouteNotFound`] for an unknown name.
    pub fn get_route(&self, name: &str) -> Result<&Route> {
        self.index
            .get(name)
            .map(|&i| &self.routes[i])
            .ok_or_else(|| RouterError::RouteNotFound(name.to_string()))
    }

    /// Returns the routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the collection holds no route.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Returns `true` if a prefix filter is configured.
    pub fn has_prefix(&self) -> bool {
        self.prefix.is_some()
    }

    /// Returns the prefix filter.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns `true` if `path` passes the prefix filter.
    ///
    /// The comparison is a case-sensitive literal prefix test.
    pub fn accepts_path(&self, path: &str) -> bool {
        self.prefix
            .as_deref()
            .is_none_or(|prefix| path.starts_with(prefix))
    }
}

impl<'a> IntoIterator for &'a RouteCollection {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}
