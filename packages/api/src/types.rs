use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP method for requests. The FruitPunchFS service only speaks GET and
/// POST.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
        }
    }
}

/// A request against the service, addressed relative to the client's base
/// URL.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub method: Method,

    /// Path relative to the configured base address.
    pub path: String,

    /// Query parameters.
    pub query: HashMap<String, String>,

    /// Request headers (merged over the client's defaults).
    pub headers: HashMap<String, String>,

    /// Request body, JSON-serialized when present.
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: impl Serialize) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Response from one round trip against the service.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,

    /// Status text (e.g., "OK", "Not Found").
    pub status_text: String,

    /// Response body parsed as JSON; null if the body was empty or not
    /// valid JSON.
    pub body: serde_json::Value,

    /// Raw body text, kept for error display.
    pub body_text: String,
}

impl ApiResponse {
    /// Check if the response status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Try to deserialize the body into a specific type.
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.body.clone())
    }
}
