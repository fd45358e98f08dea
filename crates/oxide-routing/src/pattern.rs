//! Route path compilation.
//!
//! A route path such as `/article/{name}/{page}` is compiled in two passes:
//! [`tokenize`] splits it into literal text and placeholders once, when the
//! route is built, and [`RoutePatternGenerator`] renders those tokens into an
//! anchored, case-insensitive regex using the route's rules and defaults.
//!
//! Rendering rules for the `N`th placeholder `{name}` of a path:
//!
//! | rule | default | preceded by `/` | rendered as                          |
//! |------|---------|-----------------|--------------------------------------|
//! | no   | -       | -               | the literal text `{name}`            |
//! | yes  | yes     | yes             | `(?:/(?P<pN>(?:rule)?))?`            |
//! | yes  | yes     | no              | `(?P<pN>(?:rule)?)`                  |
//! | yes  | no      | yes             | `/(?P<pN>(?:rule))`                  |
//! | yes  | no      | no              | `(?P<pN>(?:rule))`                   |
//!
//! A placeholder with a default therefore makes its whole segment optional,
//! separator included. Capture groups are numbered by placeholder position,
//! so any identifier is a valid placeholder name.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, RouterError};
use crate::route::Route;

static NEXT_GENERATOR_ID: AtomicU64 = AtomicU64::new(0);

/// A token of a tokenized route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    /// Literal text, matched verbatim.
    Literal(String),
    /// A `{name}` placeholder.
    Placeholder {
        /// The placeholder identifier.
        name: String,
        /// Whether the placeholder directly follows a `/`, i.e. the
        /// preceding literal ends with the segment separator.
        separated: bool,
    },
}

/// Normalizes a path to a single leading slash and no trailing slash.
///
/// The root path, and the empty path, normalize to `/`.
pub(crate) fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}

/// Name of the capture group of the placeholder at `index`.
pub(crate) fn group_name(index: usize) -> String {
    format!("p{index}")
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits a route path into literal and placeholder tokens.
///
/// Brace text that is not a valid `{identifier}` stays literal.
///
/// # Example
///
/// ```
/// use oxide_routing::{tokenize, PathToken};
///
/// let tokens = tokenize("/article/{name}");
/// assert_eq!(
///     tokens,
///     vec![
///         PathToken::Literal("/article/".to_string()),
///         PathToken::Placeholder { name: "name".to_string(), separated: true },
///     ]
/// );
/// ```
pub fn tokenize(path: &str) -> Vec<PathToken> {
    let path = normalize_path(path);
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = path.as_str();

    while let Some(open) = rest.find('{') {
        literal.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let ident_len = after
            .find(|c: char| !is_identifier_char(c))
            .unwrap_or(after.len());

        if ident_len > 0 && after[ident_len..].starts_with('}') {
            let separated = literal.ends_with('/');
            if !literal.is_empty() {
                tokens.push(PathToken::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(PathToken::Placeholder {
                name: after[..ident_len].to_string(),
                separated,
            });
            rest = &after[ident_len + 1..];
        } else {
            literal.push('{');
            rest = after;
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        tokens.push(PathToken::Literal(literal));
    }

    tokens
}

/// An ordered table of path aliases.
///
/// An alias lets a literal part of a route path also match an alternative
/// spelling, e.g. `article` → `artikel`. Entries are tried in insertion
/// order and at most one alias is applied per route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
}

impl AliasTable {
    /// Creates an empty alias table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alias, replacing the alternative of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, alias: impl Into<String>) {
        let key = key.into();
        let alias = alias.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = alias,
            None => self.entries.push((key, alias)),
        }
    }

    /// Adds an alias.
    #[must_use]
    pub fn alias(mut self, key: impl Into<String>, alias: impl Into<String>) -> Self {
        self.insert(key, alias);
        self
    }

    /// Returns the number of aliases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table holds no alias.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, alias)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, a)| (k.as_str(), a.as_str()))
    }
}

impl<K: Into<String>, A: Into<String>> FromIterator<(K, A)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (K, A)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, alias) in iter {
            table.insert(key, alias);
        }
        table
    }
}

/// Where the single alias of a route applies.
struct AliasSite<'a> {
    token: usize,
    offset: usize,
    key: &'a str,
    alias: &'a str,
}

impl AliasSite<'_> {
    fn end(&self) -> usize {
        self.offset + self.key.len()
    }
}

/// Compiles routes into matching regexes.
///
/// Compiled regexes are memoized by pattern string, and each route also
/// remembers the regex the first generator compiled for it. The cache is
/// safe to share between threads; two threads compiling the same pattern at
/// once both succeed and one result is kept.
#[derive(Debug)]
pub struct RoutePatternGenerator {
    id: u64,
    aliases: AliasTable,
    cache: DashMap<String, Regex>,
}

impl Default for RoutePatternGenerator {
    fn default() -> Self {
        Self::with_aliases(AliasTable::new())
    }
}

impl RoutePatternGenerator {
    /// Creates a generator without aliases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator with the given alias table.
    pub fn with_aliases(aliases: AliasTable) -> Self {
        Self {
            id: NEXT_GENERATOR_ID.fetch_add(1, Ordering::Relaxed),
            aliases,
            cache: DashMap::new(),
        }
    }

    /// Returns the alias table.
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Returns the number of compiled patterns held in the cache.
    pub fn cached_patterns(&self) -> usize {
        self.cache.len()
    }

    /// Renders the pattern string for a route.
    ///
    /// The result depends only on the route and the alias table.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_routing::{Route, RoutePatternGenerator};
    ///
    /// let route = Route::builder("blog.page", "/blog/{page}")
    ///     .rule("page", "[0-9]+")
    ///     .default_value("page", "1")
    ///     .build();
    /// let pattern = RoutePatternGenerator::new().generate(&route);
    /// assert_eq!(pattern, "(?i)^/blog(?:/(?P<p0>(?:[0-9]+)?))?$");
    /// ```
    pub fn generate(&self, route: &Route) -> String {
        let tokens = route.tokens();
        let site = self.find_alias(tokens);
        let mut pattern = String::from("(?i)^");
        let mut group = 0;
        let mut detached = false;

        for (index, token) in tokens.iter().enumerate() {
            match token {
                PathToken::Literal(text) => {
                    let site = site.as_ref().filter(|site| site.token == index);
                    // A ruled placeholder renders the separator itself unless
                    // the alias covers it.
                    detached = renders_separator(route, tokens.get(index + 1))
                        && site.is_none_or(|site| site.end() < text.len());
                    let text = if detached {
                        &text[..text.len() - 1]
                    } else {
                        text.as_str()
                    };
                    match site {
                        Some(site) => {
                            pattern.push_str(&regex::escape(&text[..site.offset]));
                            pattern.push_str("(?:");
                            pattern.push_str(&regex::escape(site.key));
                            pattern.push('|');
                            pattern.push_str(&regex::escape(site.alias));
                            pattern.push(')');
                            pattern.push_str(&regex::escape(&text[site.end()..]));
                        }
                        None => pattern.push_str(&regex::escape(text)),
                    }
                }
                PathToken::Placeholder { name, .. } => {
                    render_placeholder(&mut pattern, route, name, group, detached);
                    detached = false;
                    group += 1;
                }
            }
        }

        pattern.push('$');
        pattern
    }

    /// Returns the compiled regex for a route, compiling it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidRule`] when a rule makes the generated
    /// pattern invalid.
    pub fn compile(&self, route: &Route) -> Result<Regex> {
        if let Some((owner, regex)) = route.compiled().get() {
            if *owner == self.id {
                return Ok(regex.clone());
            }
        }

        let pattern = self.generate(route);
        let regex = match self.cache.get(&pattern) {
            Some(cached) => cached.value().clone(),
            None => {
                trace!(route = route.name(), %pattern, "compiling route pattern");
                let regex = Regex::new(&pattern).map_err(|source| RouterError::InvalidRule {
                    route: route.name().to_string(),
                    pattern: pattern.clone(),
                    source,
                })?;
                self.cache.insert(pattern, regex.clone());
                regex
            }
        };

        // Already set when another generator compiled this route first.
        let _ = route.compiled().set((self.id, regex.clone()));
        Ok(regex)
    }

    /// Finds the first alias, in table order, whose key occurs in a literal.
    fn find_alias<'a>(&'a self, tokens: &[PathToken]) -> Option<AliasSite<'a>> {
        self.aliases
            .iter()
            .filter(|(key, _)| !key.is_empty())
            .find_map(|(key, alias)| {
                tokens.iter().enumerate().find_map(|(token, t)| match t {
                    PathToken::Literal(text) => text.find(key).map(|offset| AliasSite {
                        token,
                        offset,
                        key,
                        alias,
                    }),
                    PathToken::Placeholder { .. } => None,
                })
            })
    }
}

/// Returns `true` when `next` is a slash-separated placeholder with a rule.
fn renders_separator(route: &Route, next: Option<&PathToken>) -> bool {
    matches!(
        next,
        Some(PathToken::Placeholder { name, separated: true }) if route.rule(name).is_some()
    )
}

fn render_placeholder(
    pattern: &mut String,
    route: &Route,
    name: &str,
    group: usize,
    separated: bool,
) {
    let Some(rule) = route.rule(name) else {
        pattern.push_str(&regex::escape(&format!("{{{name}}}")));
        return;
    };

    let group = group_name(group);
    let optional = route.default_value(name).is_some();
    match (optional, separated) {
        (true, true) => {
            pattern.push_str(&format!("(?:/(?P<{group}>(?:{rule})?))?"));
        }
        (true, false) => {
            pattern.push_str(&format!("(?P<{group}>(?:{rule})?)"));
        }
        (false, true) => {
            pattern.push_str(&format!("/(?P<{group}>(?:{rule}))"));
        }
        (false, false) => {
            pattern.push_str(&format!("(?P<{group}>(?:{rule}))"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_route() -> Route {
        Route::builder("articles.show", "/{name}/{page}")
            .rule("name", r"[\w\-]+")
            .rule("page", "[0-9]+")
            .default_value("page", "1")
            .build()
    }

    #[test]
    fn test_tokenize_literal_only() {
        assert_eq!(
            tokenize("/users/list/"),
            vec![PathToken::Literal("/users/list".to_string())]
        );
        assert_eq!(tokenize(""), vec![PathToken::Literal("/".to_string())]);
    }

    #[test]
    fn test_tokenize_placeholders() {
        let tokens = tokenize("/posts/{id}/page-{num}");
        assert_eq!(
            tokens,
            vec![
                PathToken::Literal("/posts/".to_string()),
                PathToken::Placeholder {
                    name: "id".to_string(),
                    separated: true
                },
                PathToken::Literal("/page-".to_string()),
                PathToken::Placeholder {
                    name: "num".to_string(),
                    separated: false
                },
            ]
        );
    }

    #[test]
    fn test_tokenize_invalid_braces_stay_literal() {
        assert_eq!(
            tokenize("/a/{}/{b-c}/{"),
            vec![PathToken::Literal("/a/{}/{b-c}/{".to_string())]
        );
    }

    #[test]
    fn test_generate_mandatory_and_optional() {
        let pattern = RoutePatternGenerator::new().generate(&article_route());
        assert_eq!(
            pattern,
            r"(?i)^/(?P<p0>(?:[\w\-]+))(?:/(?P<p1>(?:[0-9]+)?))?$"
        );
    }

    #[test]
    fn test_generate_is_deterministic() {
        let generator = RoutePatternGenerator::with_aliases(AliasTable::new().alias("a", "b"));
        let route = article_route();
        let first = generator.generate(&route);
        for _ in 0..10 {
            assert_eq!(generator.generate(&route), first);
        }
    }

    #[test]
    fn test_generate_without_rule_keeps_placeholder_literal() {
        let route = Route::builder("raw", "/files/{name}").build();
        let pattern = RoutePatternGenerator::new().generate(&route);
        assert_eq!(pattern, r"(?i)^/files/\{name\}$");

        let regex = RoutePatternGenerator::new().compile(&route).unwrap();
        assert!(regex.is_match("/files/{name}"));
        assert!(!regex.is_match("/files/readme"));
    }

    #[test]
    fn test_generate_mid_literal_default() {
        let route = Route::builder("paged", "/list/page{num}")
            .rule("num", "[0-9]+")
            .default_value("num", "1")
            .build();
        let pattern = RoutePatternGenerator::new().generate(&route);
        assert_eq!(pattern, "(?i)^/list/page(?P<p0>(?:[0-9]+)?)$");
    }

    #[test]
    fn test_generate_escapes_literals() {
        let route = Route::builder("feed", "/feed.xml").build();
        let regex = RoutePatternGenerator::new().compile(&route).unwrap();
        assert!(regex.is_match("/feed.xml"));
        assert!(!regex.is_match("/feedAxml"));
    }

    #[test]
    fn test_alias_applies_first_match_once() {
        let aliases = AliasTable::new()
            .alias("missing", "nope")
            .alias("article", "artikel")
            .alias("show", "zeige");
        let generator = RoutePatternGenerator::with_aliases(aliases);
        let route = Route::builder("a", "/article/show/article").build();

        assert_eq!(
            generator.generate(&route),
            "(?i)^/(?:article|artikel)/show/article$"
        );

        let regex = generator.compile(&route).unwrap();
        assert!(regex.is_match("/artikel/show/article"));
        assert!(regex.is_match("/article/show/article"));
        assert!(!regex.is_match("/article/zeige/article"));
        assert!(!regex.is_match("/artikel/show/artikel"));
    }

    #[test]
    fn test_alias_is_escaped() {
        let generator = RoutePatternGenerator::with_aliases(AliasTable::new().alias("news", "a.b"));
        let regex = generator
            .compile(&Route::builder("n", "/news").build())
            .unwrap();
        assert!(regex.is_match("/a.b"));
        assert!(!regex.is_match("/axb"));
    }

    #[test]
    fn test_alias_table_insert_replaces_in_place() {
        let mut table = AliasTable::new().alias("a", "1").alias("b", "2");
        table.insert("a", "3");
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_adjacent_defaults_with_prefix_names() {
        let route = Route::builder("list", "/{page}/{page_size}")
            .rule("page", "[0-9]+")
            .rule("page_size", "[0-9]+")
            .default_value("page", "1")
            .default_value("page_size", "20")
            .build();
        let generator = RoutePatternGenerator::new();
        assert_eq!(
            generator.generate(&route),
            "(?i)^(?:/(?P<p0>(?:[0-9]+)?))?(?:/(?P<p1>(?:[0-9]+)?))?$"
        );

        let regex = generator.compile(&route).unwrap();
        let caps = regex.captures("/3/50").unwrap();
        assert_eq!(&caps["p0"], "3");
        assert_eq!(&caps["p1"], "50");
        let caps = regex.captures("/3").unwrap();
        assert_eq!(&caps["p0"], "3");
        assert!(caps.name("p1").is_none());
    }

    #[test]
    fn test_compile_is_case_insensitive() {
        let regex = RoutePatternGenerator::new()
            .compile(&Route::builder("about", "/About").build())
            .unwrap();
        assert!(regex.is_match("/about"));
        assert!(regex.is_match("/ABOUT"));
    }

    #[test]
    fn test_compile_invalid_rule() {
        let route = Route::builder("broken", "/{id}").rule("id", "[0-9").build();
        let err = RoutePatternGenerator::new().compile(&route).unwrap_err();
        match err {
            RouterError::InvalidRule { route, pattern, .. } => {
                assert_eq!(route, "broken");
                assert!(pattern.contains("[0-9"));
            }
            other => panic!("expected InvalidRule, got {other:?}"),
        }
    }

    #[test]
    fn test_compile_is_cached() {
        let generator = RoutePatternGenerator::new();
        let route = article_route();
        generator.compile(&route).unwrap();
        generator.compile(&route).unwrap();
        assert_eq!(generator.cached_patterns(), 1);
    }

    #[test]
    fn test_alias_covers_separator_before_placeholder() {
        let generator =
            RoutePatternGenerator::with_aliases(AliasTable::new().alias("article/", "artikel/"));
        let route = Route::builder("a", "/article/{name}")
            .rule("name", "[a-z]+")
            .build();
        assert_eq!(
            generator.generate(&route),
            "(?i)^/(?:article/|artikel/)(?P<p0>(?:[a-z]+))$"
        );

        let regex = generator.compile(&route).unwrap();
        assert_eq!(&regex.captures("/artikel/foo").unwrap()["p0"], "foo");
        assert_eq!(&regex.captures("/article/foo").unwrap()["p0"], "foo");
        assert!(!regex.is_match("/artikelfoo"));
    }

    #[test]
    fn test_alias_before_separator_keeps_optional_segment() {
        let generator =
            RoutePatternGenerator::with_aliases(AliasTable::new().alias("blog", "weblog"));
        let route = Route::builder("b", "/blog/{page}")
            .rule("page", "[0-9]+")
            .default_value("page", "1")
            .build();
        assert_eq!(
            generator.generate(&route),
            "(?i)^/(?:blog|weblog)(?:/(?P<p0>(?:[0-9]+)?))?$"
        );
    }

    #[test]
    fn test_placeholder_names_need_not_be_group_names() {
        let route = Route::builder("d", "/x/{1st}").rule("1st", "[a-z]+").build();
        let regex = RoutePatternGenerator::new().compile(&route).unwrap();
        assert_eq!(regex.as_str(), "(?i)^/x/(?P<p0>(?:[a-z]+))$");
        assert!(regex.is_match("/x/abc"));
    }

    #[test]
    fn test_repeated_placeholder_compiles() {
        let route = Route::builder("twice", "/{id}/{id}").rule("id", "[0-9]+").build();
        let regex = RoutePatternGenerator::new().compile(&route).unwrap();
        let caps = regex.captures("/1/2").unwrap();
        assert_eq!(&caps["p0"], "1");
        assert_eq!(&caps["p1"], "2");
    }

    #[test]
    fn test_compile_is_memoized_per_route() {
        let generator = RoutePatternGenerator::new();
        let route = article_route();
        assert!(route.compiled().get().is_none());

        let regex = generator.compile(&route).unwrap();
        let (owner, memoized) = route.compiled().get().unwrap();
        assert_eq!(*owner, generator.id);
        assert_eq!(memoized.as_str(), regex.as_str());
        assert_eq!(generator.compile(&route).unwrap().as_str(), regex.as_str());
    }

    #[test]
    fn test_memoized_regex_is_not_shared_across_generators() {
        let route = Route::builder("a", "/article").build();
        let plain = RoutePatternGenerator::new();
        let aliased =
            RoutePatternGenerator::with_aliases(AliasTable::new().alias("article", "artikel"));

        assert!(!plain.compile(&route).unwrap().is_match("/artikel"));
        assert!(aliased.compile(&route).unwrap().is_match("/artikel"));
        assert!(!plain.compile(&route).unwrap().is_match("/artikel"));
    }
}
