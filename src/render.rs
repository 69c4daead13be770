//! Response template interpolation.
//!
//! Walks the declared body and rewrites every string leaf, substituting
//! request values for `:name`, `{{query.name}}` and `{{body.name}}`
//! placeholders. A placeholder with no bound value is left untouched.

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::LazyLock;

static PATH_PARAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":(\w+)").unwrap());
static QUERY_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{query\.(\w+)\}\}").unwrap());
static BODY_FIELD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{body\.(\w+)\}\}").unwrap());

/// The three parameter bags available to one request's interpolation.
/// Built per request, discarded with the response.
#[derive(Debug, Default)]
pub struct RenderContext {
    pub path_params: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
    pub body_fields: HashMap<String, String>,
}

impl RenderContext {
    pub fn new(
        path_params: HashMap<String, String>,
        query_params: HashMap<String, String>,
        request_body: Option<&Value>,
    ) -> Self {
        Self {
            path_params,
            query_params,
            body_fields: body_fields(request_body),
        }
    }
}

/// Flatten the top-level fields of a JSON request body into strings.
/// String fields substitute raw; anything else substitutes as compact JSON.
fn body_fields(body: Option<&Value>) -> HashMap<String, String> {
    let Some(Value::Object(map)) = body else {
        return HashMap::new();
    };
    map.iter()
        .map(|(key, value)| (key.clone(), field_to_string(value)))
        .collect()
}

fn field_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Render a response template against the request context.
///
/// Mappings and sequences are rebuilt recursively, preserving key and
/// element order; non-string leaves pass through unchanged.
pub fn render_template(template: &Value, ctx: &RenderContext) -> Value {
    match template {
        Value::String(text) => Value::String(render_str(text, ctx)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| render_template(item, ctx))
                .collect(),
        ),
        Value::Object(map) => {
            let mut rendered = Map::new();
            for (key, value) in map {
                rendered.insert(key.clone(), render_template(value, ctx));
            }
            Value::Object(rendered)
        }
        other => other.clone(),
    }
}

/// Apply the three substitution passes in their specified order:
/// path params, then query params, then body fields.
fn render_str(text: &str, ctx: &RenderContext) -> String {
    let text = substitute(&PATH_PARAM, text, &ctx.path_params);
    let text = substitute(&QUERY_PARAM, &text, &ctx.query_params);
    substitute(&BODY_FIELD, &text, &ctx.body_fields)
}

fn substitute(pattern: &Regex, text: &str, values: &HashMap<String, String>) -> String {
    pattern
        .replace_all(text, |caps: &Captures| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            // Unknown placeholders stay literal.
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx_with_path(pairs: &[(&str, &str)]) -> RenderContext {
        RenderContext {
            path_params: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_path_param_substituted_everywhere() {
        let ctx = ctx_with_path(&[("id", "42")]);
        let template = json!({ "id": ":id", "name": "User :id" });
        let rendered = render_template(&template, &ctx);
        assert_eq!(rendered, json!({ "id": "42", "name": "User 42" }));
    }

    #[test]
    fn test_unbound_path_param_left_alone() {
        let ctx = RenderContext::default();
        let rendered = render_template(&json!("still :id here"), &ctx);
        assert_eq!(rendered, json!("still :id here"));
    }

    #[test]
    fn test_query_param_substitution() {
        let mut ctx = RenderContext::default();
        ctx.query_params
            .insert("page".to_string(), "3".to_string());
        let template = json!({ "page": "{{query.page}}", "missing": "{{query.size}}" });
        let rendered = render_template(&template, &ctx);
        assert_eq!(rendered, json!({ "page": "3", "missing": "{{query.size}}" }));
    }

    #[test]
    fn test_missing_body_field_preserves_placeholder() {
        let ctx = RenderContext::new(HashMap::new(), HashMap::new(), Some(&json!({})));
        let rendered = render_template(&json!("{{body.email}}"), &ctx);
        assert_eq!(rendered, json!("{{body.email}}"));
    }

    #[test]
    fn test_body_field_substitution() {
        let body = json!({ "email": "a@b.c", "count": 7, "flag": true });
        let ctx = RenderContext::new(HashMap::new(), HashMap::new(), Some(&body));
        let template = json!({
            "email": "{{body.email}}",
            "count": "{{body.count}}",
            "flag": "{{body.flag}}"
        });
        let rendered = render_template(&template, &ctx);
        assert_eq!(
            rendered,
            json!({ "email": "a@b.c", "count": "7", "flag": "true" })
        );
    }

    #[test]
    fn test_non_string_leaves_pass_through() {
        let ctx = ctx_with_path(&[("id", "42")]);
        let template = json!({ "n": 5, "b": false, "z": null });
        assert_eq!(render_template(&template, &ctx), template);
    }

    #[test]
    fn test_nested_structures_rendered_in_place() {
        let ctx = ctx_with_path(&[("id", "9")]);
        let template = json!({
            "user": { "id": ":id", "tags": ["tag-:id", 1] },
            "list": [{ "ref": ":id" }]
        });
        let rendered = render_template(&template, &ctx);
        assert_eq!(
            rendered,
            json!({
                "user": { "id": "9", "tags": ["tag-9", 1] },
                "list": [{ "ref": "9" }]
            })
        );
    }

    #[test]
    fn test_key_order_preserved() {
        let ctx = RenderContext::default();
        let template = json!({ "zeta": 1, "alpha": 2, "mid": 3 });
        let rendered = render_template(&template, &ctx);
        let keys: Vec<_> = rendered.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_substitution_order_path_then_query_then_body() {
        // A path param value may itself look like a query placeholder; the
        // later pass then resolves it. Order is fixed by contract.
        let mut ctx = ctx_with_path(&[("q", "{{query.x}}")]);
        ctx.query_params.insert("x".to_string(), "done".to_string());
        let rendered = render_template(&json!(":q"), &ctx);
        assert_eq!(rendered, json!("done"));
    }

    #[test]
    fn test_non_object_request_body_yields_no_fields() {
        let ctx = RenderContext::new(HashMap::new(), HashMap::new(), Some(&json!([1, 2])));
        assert!(ctx.body_fields.is_empty());
        let ctx = RenderContext::new(HashMap::new(), HashMap::new(), None);
        assert!(ctx.body_fields.is_empty());
    }
}
