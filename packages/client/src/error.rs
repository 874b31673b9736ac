use thiserror::Error;

/// Errors produced by session, navigation and execution operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Login was rejected: the service answered with a false or absent
    /// result flag.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The operation requires an authenticated session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// An identical operation is already in flight.
    #[error("operation '{0}' already in flight")]
    InFlight(&'static str),

    /// Execute was called before any script payload was loaded.
    #[error("no script loaded")]
    NothingLoaded,

    /// The local file does not carry the expected script extension.
    #[error("unsupported script file '{0}': expected a .smia file")]
    UnsupportedExtension(String),

    /// Local file IO failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying API call failed.
    #[error(transparent)]
    Api(#[from] fruitpunch_api::Error),
}
