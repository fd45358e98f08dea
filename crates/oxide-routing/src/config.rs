//! Route table configuration.
//!
//! A route table is described as JSON:
//!
//! ```json
//! {
//!   "aliases": [["article", "artikel"]],
//!   "collections": [
//!     {
//!       "prefix": "/article",
//!       "routes": [
//!         {
//!           "name": "articles.show",
//!           "path": "/article/{name}/{page}",
//!           "controller": "ArticleController",
//!           "action": "show",
//!           "rules": { "name": "[\\w\\-]+", "page": "[0-9]+" },
//!           "defaults": { "page": 1 },
//!           "method": "GET",
//!           "scheme": "https",
//!           "hostname": "example.org"
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::collection::RouteCollection;
use crate::error::{Result, RouterError};
use crate::pattern::AliasTable;
use crate::route::Route;
use crate::router::Router;

/// A whole route table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Ordered path aliases.
    #[serde(default)]
    pub aliases: AliasTable,
    /// Collections in query order.
    #[serde(default)]
    pub collections: Vec<CollectionConfig>,
}

/// One route collection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    /// Optional literal path prefix.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Routes in match priority order.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// One route definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    /// Unique route name.
    pub name: String,
    /// Path template.
    pub path: String,
    /// Controller identifier.
    #[serde(default)]
    pub controller: String,
    /// Action identifier.
    #[serde(default)]
    pub action: String,
    /// Placeholder rules.
    #[serde(default)]
    pub rules: HashMap<String, String>,
    /// Placeholder default values.
    #[serde(default)]
    pub defaults: HashMap<String, DefaultValue>,
    /// Method constraint; absent means any.
    #[serde(default)]
    pub method: Option<String>,
    /// Scheme constraint; absent means any.
    #[serde(default)]
    pub scheme: Option<String>,
    /// Host name constraint; absent means any.
    #[serde(default)]
    pub hostname: Option<String>,
}

/// A default value as written in configuration.
///
/// Numbers and booleans are accepted for convenience and kept as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// A string value.
    Text(String),
    /// An integer value.
    Integer(i64),
    /// A floating point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
}

impl std::fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl RouteConfig {
    /// Builds the route.
    pub fn into_route(self) -> Route {
        let mut builder = Route::builder(self.name, self.path)
            .controller(self.controller)
            .action(self.action)
            .rules(self.rules)
            .defaults(self.defaults.into_iter().map(|(k, v)| (k, v.to_string())));

        if let Some(method) = self.method {
            builder = builder.method(method);
        }
        if let Some(scheme) = self.scheme {
            builder = builder.scheme(scheme);
        }
        if let Some(hostname) = self.hostname {
            builder = builder.hostname(hostname);
        }

        builder.build()
    }
}

impl CollectionConfig {
    /// Builds the collection.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateRoute`] on a name collision.
    pub fn into_collection(self) -> Result<RouteCollection> {
        let mut collection = RouteCollection::with_prefix(self.prefix.unwrap_or_default());
        collection.add_routes(self.routes.into_iter().map(RouteConfig::into_route))?;
        Ok(collection)
    }
}

impl RouterConfig {
    /// Parses a JSON route table.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Config`] for malformed JSON or unknown fields.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON route table file.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Io`] if the file cannot be read and
    /// [`RouterError::Config`] if it cannot be parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RouterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading route table");
        Self::from_json_str(&json)
    }

    /// Builds the router.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateRoute`] on a name collision within a
    /// collection.
    pub fn build(self) -> Result<Router> {
        let mut router = Router::with_aliases(self.aliases);
        for collection in self.collections {
            router.add_collection(collection.into_collection()?);
        }
        Ok(router)
    }
}
