use std::collections::BTreeMap;

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Which CORS header set a response carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorsProfile {
    /// Chat detail endpoint: GET, DELETE and preflight
    Detail,
    /// Chat list endpoint on success
    List,
    /// Bare headers used by the chat list failure path
    Minimal,
}

impl CorsProfile {
    pub fn headers(self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::from([
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ]);

        let allowed_methods = match self {
            CorsProfile::Detail => "GET,DELETE,OPTIONS",
            CorsProfile::List => "GET,OPTIONS",
            CorsProfile::Minimal => return headers,
        };
        headers.insert(
            "Access-Control-Allow-Headers".to_string(),
            "Content-Type,Authorization".to_string(),
        );
        headers.insert(
            "Access-Control-Allow-Methods".to_string(),
            allowed_methods.to_string(),
        );
        headers
    }
}

/// Gateway-style response: status, headers and a JSON body as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl InvocationResponse {
    /// Serialize `payload` as the body; non-ASCII text is kept as UTF-8
    pub fn json<T: Serialize + ?Sized>(
        status: StatusCode,
        cors: CorsProfile,
        payload: &T,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            status_code: status.as_u16(),
            headers: cors.headers(),
            body: serde_json::to_string(payload)?,
        })
    }

    pub fn empty(status: StatusCode, cors: CorsProfile) -> Self {
        Self {
            status_code: status.as_u16(),
            headers: cors.headers(),
            body: String::new(),
        }
    }

    /// Bare 500 used when even the error body cannot be produced
    pub fn internal_error(cors: CorsProfile) -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            headers: cors.headers(),
            body: r#"{"error":"Internal server error"}"#.to_string(),
        }
    }

    /// Status as an HTTP code; an out-of-range value falls back to 500
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn body_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}

impl IntoResponse for InvocationResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!("Dropping invalid response header {}", name),
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_headers() {
        let headers = CorsProfile::Detail.headers();
        assert_eq!(headers["Content-Type"], "application/json");
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(headers["Access-Control-Allow-Methods"], "GET,DELETE,OPTIONS");
        assert_eq!(headers["Access-Control-Allow-Headers"], "Content-Type,Authorization");
    }

    #[test]
    fn test_minimal_headers() {
        let headers = CorsProfile::Minimal.headers();
        assert_eq!(headers.len(), 2);
        assert!(!headers.contains_key("Access-Control-Allow-Methods"));
    }

    #[test]
    fn test_json_keeps_non_ascii() {
        let payload = json!({ "title": "こんにちは" });
        let response =
            InvocationResponse::json(StatusCode::OK, CorsProfile::List, &payload).unwrap();
        assert!(response.body.contains("こんにちは"));
    }

    #[test]
    fn test_serialized_shape_uses_status_code_key() {
        let response = InvocationResponse::empty(StatusCode::OK, CorsProfile::Detail);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["statusCode"], json!(200));
        assert_eq!(value["body"], json!(""));
    }

    #[test]
    fn test_into_axum_response() {
        let response =
            InvocationResponse::empty(StatusCode::OK, CorsProfile::Detail).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-methods").unwrap(),
            "GET,DELETE,OPTIONS"
        );
    }

    #[test]
    fn test_out_of_range_status_becomes_500() {
        let response = InvocationResponse {
            status_code: 1000,
            headers: CorsProfile::Minimal.headers(),
            body: String::new(),
        };
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
