//! Request descriptors consumed by the matchers.

use std::collections::BTreeMap;

use serde::Serialize;

/// Read access to the part of a request the path matcher needs.
pub trait RequestContext {
    /// The request path, without query string.
    fn path(&self) -> &str;
}

/// Read access to the HTTP properties checked by [`HttpRouteMatcher`].
///
/// [`HttpRouteMatcher`]: crate::HttpRouteMatcher
pub trait HttpRequestContext: RequestContext {
    /// The request method, e.g. `GET`.
    fn method(&self) -> &str;

    /// The request scheme, e.g. `https`.
    fn scheme(&self) -> &str;

    /// The requested host name, without port.
    fn hostname(&self) -> &str;
}

impl RequestContext for str {
    fn path(&self) -> &str {
        self
    }
}

impl RequestContext for String {
    fn path(&self) -> &str {
        self
    }
}

/// HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method
    Get,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// PATCH method
    Patch,
    /// DELETE method
    Delete,
    /// HEAD method
    Head,
    /// OPTIONS method
    Options,
    /// CONNECT method
    Connect,
    /// TRACE method
    Trace,
}

impl Method {
    /// Parses a method from a string, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            "CONNECT" => Some(Self::Connect),
            "TRACE" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Returns the method as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Connect => "CONNECT",
            Self::Trace => "TRACE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Path parameters extracted from a matched route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathParams {
    params: BTreeMap<String, String>,
}

impl PathParams {
    /// Creates new empty path params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Gets a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parses a parameter as a specific type.
    pub fn parse<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` when no parameter was extracted.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns an iterator over the parameters, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A request descriptor with the properties routes can be constrained on.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Request scheme.
    pub scheme: String,
    /// Requested host name.
    pub hostname: String,
    /// Request path, without query string.
    pub path: String,
}

impl Request {
    /// Creates a new request.
    ///
    /// A query string in `target` is dropped; routes match the path only.
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        let target = target.into();
        let path = match target.split_once('?') {
            Some((path, _)) => path.to_string(),
            None => target,
        };

        Self {
            method,
            scheme: "http".to_string(),
            hostname: "localhost".to_string(),
            path,
        }
    }

    /// Creates a GET request.
    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::Get, target)
    }

    /// Creates a POST request.
    pub fn post(target: impl Into<String>) -> Self {
        Self::new(Method::Post, target)
    }

    /// Sets the scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Sets the host name.
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }
}

impl RequestContext for Request {
    fn path(&self) -> &str {
        &self.path
    }
}

impl HttpRequestContext for Request {
    fn method(&self) -> &str {
        self.method.as_str()
    }

    fn scheme(&self) -> &str {
        &self.scheme
    }

    fn hostname(&self) -> &str {
        &self.hostname
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!(Method::parse("GET"), Some(Method::Get));
        assert_eq!(Method::parse("post"), Some(Method::Post));
        assert_eq!(Method::parse("INVALID"), None);
    }

    #[test]
    fn test_path_params() {
        let mut params = PathParams::new();
        params.insert("id", "123");
        params.insert("name", "test");

        assert_eq!(params.get("id"), Some("123"));
        assert_eq!(params.parse::<i64>("id"), Some(123));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_request_builder() {
        let req = Request::get("/users?page=1")
            .with_scheme("https")
            .with_hostname("example.org");

        assert_eq!(req.method, Method::Get);
        assert_eq!(RequestContext::path(&req), "/users");
        assert_eq!(HttpRequestContext::method(&req), "GET");
        assert_eq!(HttpRequestContext::scheme(&req), "https");
        assert_eq!(HttpRequestContext::hostname(&req), "example.org");
    }

    #[test]
    fn test_request_drops_query_string() {
        let req = Request::post("/search?q=a%20b&page=2");
        assert_eq!(req.path, "/search");
        assert_eq!(Request::get("/plain").path, "/plain");
    }
}
