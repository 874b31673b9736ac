//! Authentication state for one operator session.
//!
//! The service trusts the client indefinitely after a successful
//! login: no token travels with subsequent calls, so the server re-validates
//! every request on its own. [`Session`] keeps that contract but makes the
//! state an explicit, injected object instead of a process-wide flag, and
//! optionally bounds it with a client-side lease.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use fruitpunch_api::ApiClient;

use crate::error::Error;

/// Identity submitted at login. Created transiently and consumed by
/// [`Session::login`]; never retained after the attempt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub partition_id: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    result: bool,
}

/// What survives a successful login: the partition scope and when the
/// session was established.
#[derive(Debug, Clone)]
struct SessionScope {
    partition_id: String,
    established_at: Instant,
}

/// Authentication state, passed explicitly to every gated operation.
///
/// Initialized unauthenticated; [`login`](Session::login) establishes a
/// scope, [`logout`](Session::logout) unconditionally clears it. With no
/// configured lifetime the session never expires on its own.
#[derive(Debug, Default)]
pub struct Session {
    scope: Option<SessionScope>,
    lifetime: Option<Duration>,
}

impl Session {
    /// A fresh, unauthenticated session with no expiry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the session with a client-side lease: `is_authenticated`
    /// turns false once `lifetime` has elapsed since login.
    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            scope: None,
            lifetime: Some(lifetime),
        }
    }

    /// Submit credentials to the login endpoint.
    ///
    /// A response with a true result flag establishes the session; a false
    /// or absent flag fails with [`Error::InvalidCredentials`] and leaves
    /// the session unauthenticated, as does any transport or status
    /// failure.
    pub fn login(&mut self, client: &ApiClient, credentials: Credentials) -> Result<(), Error> {
        let partition_id = credentials.partition_id.clone();
        let response: LoginResponse = client.post("login", &credentials)?;

        if !response.result {
            return Err(Error::InvalidCredentials);
        }

        debug!(partition_id = %partition_id, "session established");
        self.scope = Some(SessionScope {
            partition_id,
            established_at: Instant::now(),
        });
        Ok(())
    }

    /// Reset to unauthenticated. Idempotent, no remote side effect.
    pub fn logout(&mut self) {
        self.scope = None;
    }

    /// Whether a login succeeded and (if a lifetime is configured) has not
    /// yet expired.
    pub fn is_authenticated(&self) -> bool {
        match (&self.scope, self.lifetime) {
            (Some(_), None) => true,
            (Some(scope), Some(lifetime)) => scope.established_at.elapsed() < lifetime,
            (None, _) => false,
        }
    }

    /// The partition id that scoped the login, while authenticated.
    pub fn partition_scope(&self) -> Option<&str> {
        if !self.is_authenticated() {
            return None;
        }
        self.scope.as_ref().map(|s| s.partition_id.as_str())
    }

    /// Fail unless the session is authenticated.
    pub(crate) fn require_authenticated(&self) -> Result<(), Error> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(Error::NotAuthenticated)
        }
    }
}
