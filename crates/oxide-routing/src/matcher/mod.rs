//! Route matching.
//!
//! A matcher wraps one request descriptor and tests it against collections
//! and routes in four stages: the collection prefix filter, the compiled
//! path pattern, the request property constraints (HTTP matcher only) and
//! parameter extraction. The first route passing every stage wins; there is
//! no ranking between routes.

mod basic;
mod http;

use regex::Captures;
use tracing::debug;

pub use basic::BasicRouteMatcher;
pub use http::HttpRouteMatcher;

use crate::collection::RouteCollection;
use crate::error::{Result, RouterError};
use crate::pattern::{RoutePatternGenerator, group_name, normalize_path};
use crate::request::PathParams;
use crate::route::Route;

/// A successful match: the route and its extracted parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch<'r> {
    /// The matched route.
    pub route: &'r Route,
    /// Parameters extracted from the path, defaults applied.
    pub params: PathParams,
}

/// Decides whether a request matches collections and routes.
///
/// Implementors supply the request path, the property check and storage for
/// the last extracted parameters; matching itself is shared.
pub trait RouteMatcher {
    /// The generator used to compile route patterns.
    fn generator(&self) -> &RoutePatternGenerator;

    /// The candidate request path.
    fn request_path(&self) -> &str;

    /// Checks request properties against the route's constraints.
    ///
    /// Only called once the path matched.
    fn matches_properties(&self, route: &Route) -> bool;

    /// Stores the parameters of a successful [`RouteMatcher::matches_route`].
    fn store_parameters(&mut self, params: PathParams);

    /// The parameters of the last successful [`RouteMatcher::matches_route`].
    fn route_parameters(&self) -> Option<&PathParams>;

    /// Applies the collection prefix filter.
    fn matches_collection(&self, collection: &RouteCollection) -> bool {
        let accepted = collection.accepts_path(self.request_path());
        if !accepted {
            debug!(
                prefix = collection.prefix().unwrap_or_default(),
                path = self.request_path(),
                "collection rejected by prefix"
            );
        }
        accepted
    }

    /// Tests one route and returns its parameters on success.
    ///
    /// `Ok(None)` means the route does not match.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidRule`] if the route pattern does not
    /// compile and [`RouterError::MissingParameter`] if a ruled placeholder
    /// matched without a value or a default.
    fn match_route(&self, route: &Route) -> Result<Option<PathParams>> {
        let regex = self.generator().compile(route)?;
        let path = normalize_path(self.request_path());
        let Some(captures) = regex.captures(&path) else {
            return Ok(None);
        };

        if !self.matches_properties(route) {
            debug!(route = route.name(), "path matched but request properties did not");
            return Ok(None);
        }

        extract_parameters(route, &captures).map(Some)
    }

    /// Tests one route, remembering its parameters on success.
    ///
    /// # Errors
    ///
    /// Same as [`RouteMatcher::match_route`].
    fn matches_route(&mut self, route: &Route) -> Result<bool> {
        match self.match_route(route)? {
            Some(params) => {
                self.store_parameters(params);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns the first matching route across `collections`, in order.
    ///
    /// # Errors
    ///
    /// Same as [`RouteMatcher::match_route`]; the search stops at the first
    /// error.
    fn find<'r, I>(&self, collections: I) -> Result<Option<RouteMatch<'r>>>
    where
        I: IntoIterator<Item = &'r RouteCollection>,
    {
        for collection in collections {
            if !self.matches_collection(collection) {
                continue;
            }
            for route in collection {
                if let Some(params) = self.match_route(route)? {
                    debug!(route = route.name(), path = self.request_path(), "route matched");
                    return Ok(Some(RouteMatch { route, params }));
                }
            }
        }
        Ok(None)
    }
}

/// Collects the value of every ruled placeholder, falling back to defaults.
fn extract_parameters(route: &Route, captures: &Captures<'_>) -> Result<PathParams> {
    let mut params = PathParams::new();

    for (index, name) in route.parameter_groups() {
        // A repeated placeholder keeps its first value.
        if params.get(name).is_some() {
            continue;
        }
        let captured = captures
            .name(&group_name(index))
            .map(|m| m.as_str())
            .filter(|value| !value.is_empty());
        let value = captured
            .or_else(|| route.default_value(name))
            .ok_or_else(|| RouterError::MissingParameter {
                route: route.name().to_string(),
                parameter: name.to_string(),
            })?;
        params.insert(name, value);
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_parameters_uses_defaults() {
        let route = Route::builder("r", "/{name}/{page}")
            .rule("name", "[a-z]+")
            .rule("page", "[0-9]+")
            .default_value("page", "1")
            .build();
        let regex = RoutePatternGenerator::new().compile(&route).unwrap();
        let captures = regex.captures("/abc").unwrap();
        let params = extract_parameters(&route, &captures).unwrap();
        assert_eq!(params.get("name"), Some("abc"));
        assert_eq!(params.get("page"), Some("1"));
    }

    #[test]
    fn test_extract_parameters_by_position() {
        let route = Route::builder("r", "/x/{1st}/{id}/{id}")
            .rule("1st", "[a-z]+")
            .rule("id", "[0-9]+")
            .build();
        let regex = RoutePatternGenerator::new().compile(&route).unwrap();
        let captures = regex.captures("/x/abc/1/2").unwrap();
        let params = extract_parameters(&route, &captures).unwrap();
        assert_eq!(params.get("1st"), Some("abc"));
        assert_eq!(params.get("id"), Some("1"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_extract_parameters_missing_value() {
        let route = Route::builder("r", "/a/{tail}/b")
            .rule("tail", "[0-9]*")
            .build();
        let regex = RoutePatternGenerator::new().compile(&route).unwrap();
        let captures = regex.captures("/a//b").unwrap();
        let err = extract_parameters(&route, &captures).unwrap_err();
        assert!(matches!(
            err,
            RouterError::MissingParameter { ref parameter, .. } if parameter == "tail"
        ));
    }
}
