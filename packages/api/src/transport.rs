//! HTTP execution abstraction.
//!
//! The [`Transport`] trait separates request execution from request
//! composition so the client can be exercised in tests without a network.

use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::error::Error;
use crate::types::{ApiRequest, ApiResponse};

/// Default request timeout for the production transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes one fully-addressed HTTP request.
pub trait Transport: Send + Sync {
    /// Execute the request against the resolved URL and return the raw
    /// response. A returned `Ok` only means the round trip completed; the
    /// status code may still indicate failure.
    fn execute(&self, url: Url, request: &ApiRequest) -> Result<ApiResponse, Error>;
}

/// Production transport using reqwest's blocking client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new transport with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Create with the default 30 second timeout.
    pub fn with_default_timeout() -> Result<Self, Error> {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, url: Url, request: &ApiRequest) -> Result<ApiResponse, Error> {
        let method: http::Method = request.method.into();
        let mut req_builder = self.client.request(method, url);

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder.send()?;

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();

        let body_text = response.text()?;
        let body = serde_json::from_str(&body_text).unwrap_or(serde_json::Value::Null);

        Ok(ApiResponse {
            status,
            status_text,
            body,
            body_text,
        })
    }
}

/// Mock transport for testing: returns predefined responses keyed by
/// request path and records every request it sees.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    pub struct MockTransport {
        responses: Arc<Mutex<HashMap<String, ApiResponse>>>,
        recorded: Arc<Mutex<Vec<(Url, ApiRequest)>>>,
        fail_all: Arc<Mutex<Option<String>>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Respond to requests whose relative path matches.
        pub fn with_response(self, path: impl Into<String>, response: ApiResponse) -> Self {
            self.responses
                .lock()
                .unwrap()
                .insert(path.into(), response);
            self
        }

        /// Fail every request with a decode-style transport error.
        pub fn fail_with(self, message: impl Into<String>) -> Self {
            *self.fail_all.lock().unwrap() = Some(message.into());
            self
        }

        pub fn recorded(&self) -> Vec<(Url, ApiRequest)> {
            self.recorded.lock().unwrap().clone()
        }

        pub fn success(body: serde_json::Value) -> ApiResponse {
            let body_text = body.to_string();
            ApiResponse {
                status: 200,
                status_text: "OK".to_string(),
                body,
                body_text,
            }
        }

        pub fn failure(status: u16, message: &str) -> ApiResponse {
            ApiResponse {
                status,
                status_text: message.to_string(),
                body: serde_json::json!({"error": message}),
                body_text: format!(r#"{{"error":"{}"}}"#, message),
            }
        }
    }

    impl Transport for MockTransport {
        fn execute(&self, url: Url, request: &ApiRequest) -> Result<ApiResponse, Error> {
            self.recorded
                .lock()
                .unwrap()
                .push((url, request.clone()));

            if let Some(message) = self.fail_all.lock().unwrap().clone() {
                return Err(Error::Decode {
                    path: request.path.clone(),
                    message,
                });
            }

            let responses = self.responses.lock().unwrap();
            if let Some(response) = responses.get(&request.path) {
                return Ok(response.clone());
            }

            Ok(Self::failure(404, "Not Found"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockTransport;
    use super::*;

    fn url() -> Url {
        Url::parse("http://localhost:5000/disks").unwrap()
    }

    #[test]
    fn mock_returns_configured_response() {
        let transport = MockTransport::new()
            .with_response("disks", MockTransport::success(serde_json::json!({"result": []})));

        let response = transport.execute(url(), &ApiRequest::get("disks")).unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, serde_json::json!({"result": []}));
    }

    #[test]
    fn mock_returns_404_when_no_match() {
        let transport = MockTransport::new();
        let response = transport
            .execute(url(), &ApiRequest::get("unknown"))
            .unwrap();

        assert_eq!(response.status, 404);
    }

    #[test]
    fn mock_fails_when_configured() {
        let transport = MockTransport::new().fail_with("connection refused");
        let result = transport.execute(url(), &ApiRequest::get("disks"));

        assert!(result.is_err());
    }

    #[test]
    fn mock_records_requests() {
        let transport = MockTransport::new();
        transport
            .execute(url(), &ApiRequest::get("disks"))
            .unwrap();
        transport
            .execute(url(), &ApiRequest::post("login"))
            .unwrap();

        let recorded = transport.recorded();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].1.path, "disks");
        assert_eq!(recorded[1].1.method, crate::types::Method::Post);
    }

    #[test]
    fn reqwest_transport_creation() {
        assert!(ReqwestTransport::with_default_timeout().is_ok());
        assert!(ReqwestTransport::new(Duration::from_secs(5)).is_ok());
    }
}
