//! Shared state threaded through every shell command.

use fruitpunch_api::ApiClient;
use fruitpunch_client::{ExecutionSession, FilesystemView, Navigator, Session};

/// Everything a command can touch: the API client, the operator session,
/// the navigator, the execution session, and the currently open filesystem
/// view (if any).
pub struct AppContext {
    pub client: ApiClient,
    pub session: Session,
    pub navigator: Navigator,
    pub exec: ExecutionSession,
    pub view: Option<FilesystemView>,
}

impl AppContext {
    /// Create a context against the given service base address.
    pub fn new(base_url: &str) -> Result<Self, fruitpunch_api::Error> {
        Ok(Self {
            client: ApiClient::new(base_url)?,
            session: Session::new(),
            navigator: Navigator::new(),
            exec: ExecutionSession::new(),
            view: None,
        })
    }
}
