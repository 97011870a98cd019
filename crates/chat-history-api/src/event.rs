//! Invocation events and ordered field lookup.
//!
//! Depending on how the gateway integration is configured, the same logical
//! field (the HTTP method, for instance) can sit at different places in the
//! event. Lookups are expressed as an ordered list of paths and the first path
//! that yields a non-empty string wins.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A path of object keys into the event.
pub type FieldPath = &'static [&'static str];

/// Where the HTTP method may live, in priority order.
pub const METHOD_PATHS: &[FieldPath] = &[
    &["httpMethod"],
    &["requestContext", "httpMethod"],
    &["requestContext", "http", "method"],
];

/// Verified subject claim set by the upstream JWT authorizer.
pub const USER_ID_PATH: FieldPath = &["requestContext", "authorizer", "jwt", "claims", "sub"];

/// Follow `path` through nested objects.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

/// First non-empty string found along `rules`, tried in order.
pub fn first_string<'a>(value: &'a Value, rules: &[FieldPath]) -> Option<&'a str> {
    rules.iter().find_map(|path| {
        lookup(value, path)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    })
}

/// Raw invocation event as delivered by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvocationEvent(Value);

impl InvocationEvent {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// Build an HTTP API (payload v2) shaped event
    pub fn http_api(
        method: &str,
        raw_path: &str,
        path_parameters: &[(&str, &str)],
        user_id: Option<&str>,
    ) -> Self {
        let mut request_context = json!({
            "http": { "method": method, "path": raw_path },
        });
        if let Some(sub) = user_id {
            request_context["authorizer"] = json!({ "jwt": { "claims": { "sub": sub } } });
        }

        let mut event = json!({
            "version": "2.0",
            "rawPath": raw_path,
            "requestContext": request_context,
        });
        if !path_parameters.is_empty() {
            let params: Map<String, Value> = path_parameters
                .iter()
                .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
                .collect();
            event["pathParameters"] = Value::Object(params);
        }

        Self(event)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Upper-cased HTTP method, if any of the known locations carries one
    pub fn http_method(&self) -> Option<String> {
        first_string(&self.0, METHOD_PATHS).map(str::to_uppercase)
    }

    /// Caller identity from the authorizer claims
    pub fn user_id(&self) -> Option<&str> {
        first_string(&self.0, &[USER_ID_PATH])
    }

    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        lookup(&self.0, &["pathParameters", name])
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn top_level_keys(&self) -> Vec<String> {
        object_keys(Some(&self.0)).unwrap_or_default()
    }

    /// `None` when the event has no `requestContext` object at all
    pub fn request_context_keys(&self) -> Option<Vec<String>> {
        object_keys(self.0.get("requestContext"))
    }
}

impl From<Value> for InvocationEvent {
    fn from(raw: Value) -> Self {
        Self::new(raw)
    }
}

fn object_keys(value: Option<&Value>) -> Option<Vec<String>> {
    value
        .and_then(Value::as_object)
        .map(|map| map.keys().cloned().collect())
}
