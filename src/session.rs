//! Login state of the current user.
//!
//! The resolver starts out `Unauthenticated`. [`SessionResolver::resolve`] trusts a
//! persisted identity while the configured [`SessionPolicy`] considers it fresh and
//! only asks the backend otherwise. A failed identity check is not an error: it just
//! means nobody is logged in.

use crate::api_client::{ApiError, Backend};
use crate::configuration::SessionPolicy;
use crate::foundation::database::{clear_identity, load_identity, store_identity, unix_now};
use crate::foundation::models::SessionIdentity;
use crate::routes::Route;
use sled::Db;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(SessionIdentity),
}

impl SessionState {
    pub fn identity(&self) -> Option<&SessionIdentity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            SessionState::Unauthenticated => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Logout failed: {0}")]
    Logout(#[from] ApiError),
}

pub struct SessionResolver {
    backend: Arc<dyn Backend>,
    db: Db,
    policy: SessionPolicy,
    login_url: String,
    state: SessionState,
}

impl SessionResolver {
    pub fn new(backend: Arc<dyn Backend>, db: Db, policy: SessionPolicy, login_url: &str) -> Self {
        Self {
            backend,
            db,
            policy,
            login_url: login_url.to_string(),
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Where the browser is sent to start the OAuth login.
    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Determines whether the client is logged in.
    ///
    /// A fresh persisted identity is trusted without contacting the backend.
    pub async fn resolve(&mut self) -> &SessionState {
        if self.policy.persist {
            match load_identity(&self.db) {
                Ok(Some(stored)) if stored.is_fresh(unix_now(), self.policy.max_age_seconds) => {
                    debug!(user = %stored.identity.name, "using persisted identity");
                    self.state = SessionState::Authenticated(stored.identity);
                    return &self.state;
                }
                Ok(Some(_)) => debug!("persisted identity expired"),
                Ok(None) => {}
                Err(e) => warn!(%e, "persisted identity is unreadable"),
            }
        }

        self.revalidate().await
    }

    /// Asks the backend for the current identity, ignoring anything persisted.
    pub async fn revalidate(&mut self) -> &SessionState {
        match self.backend.user_info().await {
            Ok(Some(identity)) => {
                info!(user = %identity.name, "user info fetched");
                if self.policy.persist {
                    if let Err(e) = store_identity(&self.db, &identity, unix_now()) {
                        warn!(%e, "failed to persist identity");
                    }
                }
                self.state = SessionState::Authenticated(identity);
            }
            Ok(None) => {
                debug!("user is not logged in");
                self.forget();
            }
            Err(e) if e.is_unauthorized() => {
                debug!("identity check rejected");
                self.forget();
            }
            Err(e) => {
                warn!(%e, "failed to fetch user info");
                self.forget();
            }
        }
        &self.state
    }

    /// Called when the client regains focus; revalidates if the policy asks for it.
    pub async fn on_focus(&mut self) -> &SessionState {
        if self.policy.revalidate_on_focus {
            return self.revalidate().await;
        }
        &self.state
    }

    /// Any 401 seen by another request ends the local session.
    pub fn handle_unauthorized(&mut self) {
        if self.state.is_logged_in() {
            info!("session rejected by backend");
        }
        self.forget();
    }

    /// Logs out on the backend and, if that succeeds, locally.
    ///
    /// On success the landing page is returned as the place to navigate to. On failure
    /// the local state is left exactly as it was.
    pub async fn logout(&mut self) -> Result<Route, SessionError> {
        match self.backend.logout().await {
            Ok(()) => {
                info!("logout successful");
                self.forget();
                Ok(Route::Home)
            }
            Err(e) => {
                warn!(%e, "failed to log out");
                Err(e.into())
            }
        }
    }

    fn forget(&mut self) {
        if let Err(e) = clear_identity(&self.db) {
            warn!(%e, "failed to clear persisted identity");
        }
        self.state = SessionState::Unauthenticated;
    }
}
