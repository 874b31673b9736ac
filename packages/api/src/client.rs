use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{ApiRequest, ApiResponse};

/// Typed client for the FruitPunchFS service.
///
/// Holds the configured base address and a [`Transport`]. Every request is
/// sent as `Content-Type: application/json`; responses are decoded into the
/// caller's record type. A non-success status fails the call with
/// [`Error::RequestFailed`] carrying the path and status.
pub struct ApiClient {
    base_url: Url,
    transport: Box<dyn Transport>,
}

impl ApiClient {
    /// Create a client against the given base address, using the default
    /// reqwest transport.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let transport = ReqwestTransport::with_default_timeout()?;
        Self::with_transport(base_url, Box::new(transport))
    }

    /// Create a client with an explicit transport (used in tests).
    pub fn with_transport(base_url: &str, transport: Box<dyn Transport>) -> Result<Self, Error> {
        // Trailing slash so Url::join treats the base as a directory.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)?;

        Ok(Self {
            base_url,
            transport,
        })
    }

    /// The configured base address.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue a GET for `path` and decode the response.
    pub fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, Error> {
        self.send(ApiRequest::get(path))
    }

    /// Issue a GET for `path` with query parameters and decode the response.
    pub fn get_with_query<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<R, Error> {
        let mut request = ApiRequest::get(path);
        for (name, value) in query {
            request = request.with_query(*name, *value);
        }
        self.send(request)
    }

    /// POST `body` to `path` and decode the response.
    pub fn post<T: Serialize, R: DeserializeOwned>(&self, path: &str, body: &T) -> Result<R, Error> {
        let request = ApiRequest::post(path)
            .with_body(body)
            .map_err(|e| Error::Decode {
                path: path.to_string(),
                message: format!("unserializable request body: {}", e),
            })?;
        self.send(request)
    }

    /// Send a prepared request and decode the response into `R`.
    pub fn send<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, Error> {
        let response = self.send_raw(&request)?;
        response.json().map_err(|e| Error::Decode {
            path: request.path.clone(),
            message: e.to_string(),
        })
    }

    /// Send a prepared request and return the raw response, failing on a
    /// non-success status.
    pub fn send_raw(&self, request: &ApiRequest) -> Result<ApiResponse, Error> {
        let url = self.base_url.join(&request.path)?;
        debug!(method = ?request.method, path = %request.path, "sending request");

        let mut request = request.clone();
        request
            .headers
            .entry("Content-Type".to_string())
            .or_insert_with(|| "application/json".to_string());

        let response = self.transport.execute(url, &request)?;

        if !response.is_success() {
            return Err(Error::RequestFailed {
                path: request.path,
                status: response.status,
                status_text: response.status_text,
            });
        }

        Ok(response)
    }
}
