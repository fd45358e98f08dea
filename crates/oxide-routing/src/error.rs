//! Error types for routing.

use std::path::PathBuf;

use thiserror::Error;

/// Router-specific errors.
///
/// Every variant is a configuration or consistency failure. A request that
/// matches no route is not an error; matchers report it as `false` or
/// `None`.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A route with the same name is already registered in the collection.
    #[error("duplicate route: {0}")]
    DuplicateRoute(String),

    /// Route name not found.
    #[error("route not found: {0}")]
    RouteNotFound(String),

    /// A placeholder rule produced a pattern the regex engine rejects.
    #[error("invalid rule in route '{route}' (pattern `{pattern}`): {source}")]
    InvalidRule {
        /// Name of the offending route.
        route: String,
        /// The generated pattern that failed to compile.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A ruled placeholder matched with neither a capture nor a default.
    #[error("route '{route}' matched without a value for parameter '{parameter}'")]
    MissingParameter {
        /// Name of the matched route.
        route: String,
        /// The placeholder that has no value.
        parameter: String,
    },

    /// The route table configuration could not be parsed.
    #[error("invalid route configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The route table file could not be read.
    #[error("failed to read route configuration '{path}': {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
