//! Route definitions.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use tracing::warn;

use crate::pattern::{PathToken, tokenize};

/// Configuration value meaning "match any" for a request property.
pub const WILDCARD: &str = "*";

/// A constraint on one request property (method, scheme or host name).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum PropertyConstraint {
    /// Any value is accepted.
    #[default]
    Any,
    /// Only this value is accepted.
    Exact(String),
}

impl PropertyConstraint {
    /// Creates a constraint from a configured value.
    ///
    /// An empty string or [`WILDCARD`] yields [`PropertyConstraint::Any`].
    pub fn from_value(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() || value == WILDCARD {
            Self::Any
        } else {
            Self::Exact(value)
        }
    }

    /// Returns `true` for the wildcard constraint.
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns the required value, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Any => None,
            Self::Exact(v) => Some(v),
        }
    }

    /// Checks a request value against the constraint.
    pub fn accepts(&self, actual: &str, ignore_case: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) if ignore_case => expected.eq_ignore_ascii_case(actual),
            Self::Exact(expected) => expected == actual,
        }
    }
}

impl std::fmt::Display for PropertyConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.value().unwrap_or(WILDCARD))
    }
}

/// A routable endpoint.
///
/// Routes are assembled with [`RouteBuilder`] and are read-only once built.
///
/// # Example
///
/// ```
/// use oxide_routing::Route;
///
/// let route = Route::builder("articles.show", "/article/{name}/{page}")
///     .controller("ArticleController")
///     .action("show")
///     .rule("name", r"[\w\-]+")
///     .rule("page", "[0-9]+")
///     .default_value("page", "1")
///     .method("GET")
///     .build();
///
/// assert_eq!(route.name(), "articles.show");
/// assert_eq!(route.default_value("page"), Some("1"));
/// assert_eq!(route.placeholders().collect::<Vec<_>>(), vec!["name", "page"]);
/// ```
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    path: String,
    controller: String,
    action: String,
    rules: HashMap<String, String>,
    defaults: HashMap<String, String>,
    method: PropertyConstraint,
    scheme: PropertyConstraint,
    hostname: PropertyConstraint,
    tokens: Vec<PathToken>,
    compiled: OnceLock<(u64, Regex)>,
}

impl Route {
    /// Creates a route without rules or constraints.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::builder(name, path)
            .controller(controller)
            .action(action)
            .build()
    }

    /// Starts building a route.
    pub fn builder(name: impl Into<String>, path: impl Into<String>) -> RouteBuilder {
        RouteBuilder::new(name, path)
    }

    /// Returns the route name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the path template.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the controller identifier.
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Returns the action identifier.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns all declared rules.
    pub fn rules(&self) -> &HashMap<String, String> {
        &self.rules
    }

    /// Returns the rule for a placeholder.
    pub fn rule(&self, name: &str) -> Option<&str> {
        self.rules.get(name).map(String::as_str)
    }

    /// Returns all default values.
    pub fn defaults(&self) -> &HashMap<String, String> {
        &self.defaults
    }

    /// Returns the default value for a placeholder.
    pub fn default_value(&self, name: &str) -> Option<&str> {
        self.defaults.get(name).map(String::as_str)
    }

    /// Returns the method constraint.
    pub fn method(&self) -> &PropertyConstraint {
        &self.method
    }

    /// Returns the scheme constraint.
    pub fn scheme(&self) -> &PropertyConstraint {
        &self.scheme
    }

    /// Returns the host name constraint.
    pub fn hostname(&self) -> &PropertyConstraint {
        &self.hostname
    }

    /// Returns the tokenized path.
    pub fn tokens(&self) -> &[PathToken] {
        &self.tokens
    }

    /// Iterates over placeholder names in path order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|token| match token {
            PathToken::Placeholder { name, .. } => Some(name.as_str()),
            PathToken::Literal(_) => None,
        })
    }

    /// Iterates over placeholders that have a rule, i.e. the parameters a
    /// match extracts.
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.placeholders()
            .filter(|name| self.rules.contains_key(*name))
    }

    /// Iterates over ruled placeholders with their position among all
    /// placeholders, which numbers their capture group.
    pub(crate) fn parameter_groups(&self) -> impl Iterator<Item = (usize, &str)> {
        self.placeholders()
            .enumerate()
            .filter(|(_, name)| self.rules.contains_key(*name))
    }

    /// The regex compiled for this route, tagged with the compiling generator.
    pub(crate) fn compiled(&self) -> &OnceLock<(u64, Regex)> {
        &self.compiled
    }
}

/// Builder for [`Route`].
#[derive(Debug, Clone)]
pub struct RouteBuilder {
    name: String,
    path: String,
    controller: String,
    action: String,
    rules: HashMap<String, String>,
    defaults: HashMap<String, String>,
    method: PropertyConstraint,
    scheme: PropertyConstraint,
    hostname: PropertyConstraint,
}

impl RouteBuilder {
    /// Creates a builder for a route with the given name and path.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            controller: String::new(),
            action: String::new(),
            rules: HashMap::new(),
            defaults: HashMap::new(),
            method: PropertyConstraint::Any,
            scheme: PropertyConstraint::Any,
            hostname: PropertyConstraint::Any,
        }
    }

    /// Sets the controller identifier.
    #[must_use]
    pub fn controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = controller.into();
        self
    }

    /// Sets the action identifier.
    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Declares the regex rule for a placeholder.
    #[must_use]
    pub fn rule(mut self, name: impl Into<String>, rule: impl Into<String>) -> Self {
        self.rules.insert(name.into(), rule.into());
        self
    }

    /// Declares several rules.
    #[must_use]
    pub fn rules<K, V>(mut self, rules: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.rules
            .extend(rules.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Declares the default value for a placeholder.
    #[must_use]
    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Declares several default values.
    #[must_use]
    pub fn defaults<K, V>(mut self, defaults: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.defaults
            .extend(defaults.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Restricts the request method. `*` accepts any method.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = PropertyConstraint::from_value(method);
        self
    }

    /// Restricts the request scheme. `*` accepts any scheme.
    #[must_use]
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = PropertyConstraint::from_value(scheme);
        self
    }

    /// Restricts the request host name. `*` accepts any host.
    #[must_use]
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = PropertyConstraint::from_value(hostname);
        self
    }

    /// Builds the route, tokenizing its path.
    pub fn build(self) -> Route {
        let tokens = tokenize(&self.path);

        for token in &tokens {
            if let PathToken::Placeholder { name, .. } = token {
                if !self.rules.contains_key(name) {
                    warn!(
                        route = %self.name,
                        placeholder = %name,
                        "placeholder has no rule and will only match its literal text"
                    );
                }
            }
        }

        Route {
            name: self.name,
            path: self.path,
            controller: self.controller,
            action: self.action,
            rules: self.rules,
            defaults: self.defaults,
            method: self.method,
            scheme: self.scheme,
            hostname: self.hostname,
            tokens,
            compiled: OnceLock::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_route_has_wildcards() {
        let route = Route::new("home", "/", "HomeController", "index");
        assert_eq!(route.controller(), "HomeController");
        assert_eq!(route.action(), "index");
        assert!(route.method().is_any());
        assert!(route.scheme().is_any());
        assert!(route.hostname().is_any());
        assert!(route.rules().is_empty());
    }

    #[test]
    fn test_wildcard_values() {
        assert_eq!(PropertyConstraint::from_value("*"), PropertyConstraint::Any);
        assert_eq!(PropertyConstraint::from_value(""), PropertyConstraint::Any);
        assert_eq!(
            PropertyConstraint::from_value("GET"),
            PropertyConstraint::Exact("GET".to_string())
        );
        assert_eq!(PropertyConstraint::Any.to_string(), "*");
    }

    #[test]
    fn test_constraint_accepts() {
        let get = PropertyConstraint::from_value("GET");
        assert!(get.accepts("get", true));
        assert!(!get.accepts("get", false));
        assert!(!get.accepts("POST", true));
        assert!(PropertyConstraint::Any.accepts("anything", false));
    }

    #[test]
    fn test_parameters_only_ruled_placeholders() {
        let route = Route::builder("r", "/{a}/{b}/{c}")
            .rules([("a", "[a-z]+"), ("c", "[0-9]+"), ("unused", ".*")])
            .build();
        assert_eq!(route.placeholders().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(route.parameters().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(
            route.parameter_groups().collect::<Vec<_>>(),
            vec![(0, "a"), (2, "c")]
        );
    }

    #[test]
    fn test_builder_constraints() {
        let route = Route::builder("r", "/")
            .method("POST")
            .scheme("https")
            .hostname("example.org")
            .build();
        assert_eq!(route.method().value(), Some("POST"));
        assert_eq!(route.scheme().value(), Some("https"));
        assert_eq!(route.hostname().value(), Some("example.org"));
    }
}
