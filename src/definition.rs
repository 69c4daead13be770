//! Endpoint definitions.
//!
//! The authored declaration shape, the closed HTTP method enum, and the
//! resolved record the dispatch engine routes on.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// The HTTP methods a mock endpoint can declare.
///
/// Parsed case-insensitively; anything outside this set is rejected at load
/// time so the rest of the engine never handles raw method strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

/// Error for a method string outside the recognized set.
#[derive(Debug, Error)]
#[error("unrecognized method: {0:?}")]
pub struct MethodParseError(String);

impl Method {
    /// Parse a method string, ignoring case.
    pub fn parse(value: &str) -> Result<Self, MethodParseError> {
        match value.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            _ => Err(MethodParseError(value.to_string())),
        }
    }

    /// Canonical uppercase form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl TryFrom<String> for Method {
    type Error = MethodParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single endpoint declaration as written in a definition file.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointDeclaration {
    /// HTTP method to respond to.
    pub method: Method,

    /// Route pattern, leading `/`; `:name` segments bind path parameters.
    pub path: String,

    /// HTTP status code of the response.
    pub status: u16,

    /// Response template. String leaves may carry `:name`, `{{query.name}}`
    /// and `{{body.name}}` placeholders.
    pub body: serde_json::Value,

    /// Artificial latency before responding, in milliseconds.
    #[serde(default, rename = "delayMs")]
    pub delay_ms: Option<u64>,
}

impl EndpointDeclaration {
    /// Validate the declaration shape.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.path.starts_with('/') {
            anyhow::bail!("path must start with '/', got {:?}", self.path);
        }
        if !(100..=599).contains(&self.status) {
            anyhow::bail!("status {} is outside the valid HTTP range", self.status);
        }
        Ok(())
    }

    /// Combine this declaration with the prefix derived from its file's
    /// location, producing the record the engine routes on.
    pub fn resolve(self, prefix: &str, source: &str) -> ResolvedEndpoint {
        let full_path = collapse_slashes(&format!("{}{}", prefix, self.path));
        ResolvedEndpoint {
            method: self.method,
            full_path,
            status: self.status,
            body: self.body,
            delay_ms: self.delay_ms.unwrap_or(0),
            source: source.to_string(),
        }
    }
}

/// A declaration after prefix resolution, ready for routing.
///
/// Built once at startup and never mutated while serving.
#[derive(Debug, Clone)]
pub struct ResolvedEndpoint {
    /// Declared method.
    pub method: Method,

    /// Final route pattern: file prefix + declared path, slashes collapsed.
    pub full_path: String,

    /// Declared status code.
    pub status: u16,

    /// Response template.
    pub body: serde_json::Value,

    /// Artificial latency in milliseconds (0 = none).
    pub delay_ms: u64,

    /// Originating definition file, relative to the root (diagnostics only).
    pub source: String,
}

/// Collapse runs of `/` into a single separator.
fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_was_slash = false;
    for ch in path.chars() {
        if ch == '/' {
            if previous_was_slash {
                continue;
            }
            previous_was_slash = true;
        } else {
            previous_was_slash = false;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_case_insensitive() {
        assert_eq!(Method::parse("get").unwrap(), Method::Get);
        assert_eq!(Method::parse("Post").unwrap(), Method::Post);
        assert_eq!(Method::parse("DELETE").unwrap(), Method::Delete);
        assert!(Method::parse("HEAD").is_err());
        assert!(Method::parse("").is_err());
    }

    #[test]
    fn test_parse_declaration() {
        let yaml = r#"
method: get
path: /users/:id
status: 200
body:
  id: ":id"
delayMs: 250
"#;
        let decl: EndpointDeclaration = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(decl.method, Method::Get);
        assert_eq!(decl.path, "/users/:id");
        assert_eq!(decl.status, 200);
        assert_eq!(decl.delay_ms, Some(250));
    }

    #[test]
    fn test_parse_rejects_unrecognized_method() {
        let yaml = "method: TRACE\npath: /x\nstatus: 200\nbody: ok\n";
        assert!(serde_yaml::from_str::<EndpointDeclaration>(yaml).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let yaml = "method: GET\nstatus: 200\nbody: ok\n";
        assert!(serde_yaml::from_str::<EndpointDeclaration>(yaml).is_err());
    }

    #[test]
    fn test_validate_path_and_status() {
        let mut decl: EndpointDeclaration =
            serde_yaml::from_str("method: GET\npath: /ok\nstatus: 200\nbody: ok\n").unwrap();
        assert!(decl.validate().is_ok());

        decl.path = "no-slash".to_string();
        assert!(decl.validate().is_err());

        decl.path = "/ok".to_string();
        decl.status = 42;
        assert!(decl.validate().is_err());
    }

    #[test]
    fn test_resolve_collapses_slashes() {
        let decl: EndpointDeclaration =
            serde_yaml::from_str("method: GET\npath: /:id\nstatus: 200\nbody: ok\n").unwrap();
        let endpoint = decl.resolve("/users/", "users.yaml");
        assert_eq!(endpoint.full_path, "/users/:id");
        assert_eq!(endpoint.delay_ms, 0);
        assert_eq!(endpoint.source, "users.yaml");
    }
}
