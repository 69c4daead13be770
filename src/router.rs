//! Route table and pattern matching.
//!
//! Patterns follow standard path-template semantics: a literal segment
//! matches only itself, a `:name` segment matches any single non-empty
//! segment and binds its value.

use crate::definition::{Method, ResolvedEndpoint};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a pattern like `/users/:id`.
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|part| !part.is_empty())
            .map(|part| match part.strip_prefix(':') {
                Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                _ => Segment::Literal(part.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// Match a request path, binding `:name` segments on success.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(params)
    }
}

struct Route {
    pattern: RoutePattern,
    endpoint: ResolvedEndpoint,
}

/// A successful lookup: the endpoint plus the path parameters it bound.
pub struct RouteMatch<'a> {
    pub endpoint: &'a ResolvedEndpoint,
    pub path_params: HashMap<String, String>,
}

/// The immutable routing surface, built once before serving.
///
/// Registering the same `(method, full_path)` twice replaces the earlier
/// entry: last registration wins.
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build the table from the loader's resolved endpoint list,
    /// preserving registration order.
    pub fn build(endpoints: Vec<ResolvedEndpoint>) -> Self {
        let mut routes: Vec<Route> = Vec::with_capacity(endpoints.len());

        for endpoint in endpoints {
            let existing = routes.iter_mut().find(|route| {
                route.endpoint.method == endpoint.method
                    && route.endpoint.full_path == endpoint.full_path
            });
            match existing {
                Some(route) => {
                    debug!(
                        method = %endpoint.method,
                        path = %endpoint.full_path,
                        previous = %route.endpoint.source,
                        replacement = %endpoint.source,
                        "Duplicate route registration, last one wins"
                    );
                    route.endpoint = endpoint;
                }
                None => {
                    let pattern = RoutePattern::parse(&endpoint.full_path);
                    routes.push(Route { pattern, endpoint });
                }
            }
        }

        Self { routes }
    }

    /// Number of distinct registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The registered endpoints, in registration order. Read-only view for
    /// documentation tooling and diagnostics.
    pub fn endpoints(&self) -> impl Iterator<Item = &ResolvedEndpoint> {
        self.routes.iter().map(|route| &route.endpoint)
    }

    /// Find the first registered route matching `method` + `path`.
    pub fn lookup(&self, method: Method, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter(|route| route.endpoint.method == method)
            .find_map(|route| {
                route.pattern.matches(path).map(|path_params| RouteMatch {
                    endpoint: &route.endpoint,
                    path_params,
                })
            })
    }
}
