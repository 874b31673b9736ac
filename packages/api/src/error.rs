use thiserror::Error;

/// Errors produced by the API client.
#[derive(Debug, Error)]
pub enum Error {
    /// The channel was unreachable or the round trip failed mid-flight.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The base address or a joined request path was not a valid URL.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The round trip completed but the service answered with a
    /// non-success status.
    #[error("request to '{path}' failed: HTTP {status} {status_text}")]
    RequestFailed {
        path: String,
        status: u16,
        status_text: String,
    },

    /// The response body could not be decoded into the expected record.
    #[error("undecodable response from '{path}': {message}")]
    Decode { path: String, message: String },
}

impl Error {
    /// Whether this error carries a non-success HTTP status (as opposed to
    /// a transport-level failure).
    pub fn is_request_failed(&self) -> bool {
        matches!(self, Error::RequestFailed { .. })
    }
}
