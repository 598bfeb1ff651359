// ── Session lifecycle management ──
//
// State machine over the shared session context: login, logout,
// persisted-session rehydration at startup, and the forced-logout
// transition driven by the client's expiry signal. State transitions
// are broadcast on a watch channel; the view layer navigates on them.
//
// Concurrency: every login start and logout bumps the session
// generation, and results carrying a stale generation are dropped, so a
// logout always wins over a concurrently-resolving login.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use opsdeck_api::session::{SessionSignal, SessionSnapshot, TokenPair, UserProfile};
use opsdeck_api::BackofficeClient;

use crate::error::CoreError;

// ── SessionState ─────────────────────────────────────────────────────

/// Authentication state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No session. Reached at startup (without a persisted session),
    /// after a user-initiated logout, or after a failed login.
    LoggedOut,
    /// A login request is in flight.
    Authenticating,
    /// Active session with the given user.
    LoggedIn { user: UserProfile },
    /// The session expired irrecoverably (token refresh failed). Same
    /// effect as a logout, but distinguishable so the view can explain
    /// the redirect.
    RefreshFailed,
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn { .. })
    }
}

// ── SessionManager ───────────────────────────────────────────────────

/// Owns the login/logout flows and the observable [`SessionState`].
pub struct SessionManager {
    client: Arc<BackofficeClient>,
    state: watch::Sender<SessionState>,
    error: watch::Sender<Option<String>>,
}

impl SessionManager {
    pub fn new(client: Arc<BackofficeClient>) -> Self {
        let (state, _) = watch::channel(SessionState::LoggedOut);
        let (error, _) = watch::channel(None);
        Self {
            client,
            state,
            error,
        }
    }

    /// Rehydrate a persisted session at startup.
    ///
    /// A valid-looking stored user + token pair transitions straight to
    /// [`SessionState::LoggedIn`] without re-validating against the
    /// server; the first rejected request will trigger a refresh (and a
    /// forced logout if that fails).
    pub fn bootstrap(&self) -> Result<Option<UserProfile>, CoreError> {
        let user = self.client.session().bootstrap()?;
        if let Some(user) = &user {
            debug!(email = %user.email, "rehydrated persisted session");
            self.state.send_replace(SessionState::LoggedIn { user: user.clone() });
        }
        Ok(user)
    }

    /// Authenticate and install the session.
    ///
    /// Transitions through [`SessionState::Authenticating`]; on success
    /// the user + token pair are persisted and the state becomes
    /// [`SessionState::LoggedIn`]. On failure nothing is persisted and
    /// the state returns to [`SessionState::LoggedOut`] with the error
    /// exposed on [`watch_error`](Self::watch_error).
    pub async fn login(
        &self,
        identifier: &str,
        password: &SecretString,
    ) -> Result<UserProfile, CoreError> {
        let session = self.client.session();
        let generation = session.begin_login();

        self.error.send_replace(None);
        self.state.send_replace(SessionState::Authenticating);

        match self.client.login(identifier, password).await {
            Ok(auth) => {
                let user = auth.user.clone();
                let snapshot = SessionSnapshot {
                    user: auth.user,
                    tokens: TokenPair {
                        access: auth.token,
                        refresh: auth.refresh_token,
                    },
                };
                let installed = session
                    .install(generation, snapshot)
                    .map_err(CoreError::from)?;
                if !installed {
                    // A logout (or newer login) landed while this request
                    // was in flight; its state stands, ours is dropped.
                    debug!("login result superseded, leaving session state untouched");
                    return Err(CoreError::Auth {
                        message: "login superseded by a newer session action".into(),
                    });
                }
                info!(email = %user.email, "login successful");
                self.state
                    .send_replace(SessionState::LoggedIn { user: user.clone() });
                Ok(user)
            }
            Err(e) => {
                let err = CoreError::from(e);
                // Rewind only if no newer login/logout advanced the session.
                if session.generation() == generation {
                    self.error.send_replace(Some(err.to_string()));
                    self.state.send_replace(SessionState::LoggedOut);
                }
                Err(err)
            }
        }
    }

    /// Clear the persisted session and return to
    /// [`SessionState::LoggedOut`]. Idempotent.
    pub fn logout(&self) -> Result<(), CoreError> {
        self.client.session().clear()?;
        self.error.send_replace(None);
        self.state.send_replace(SessionState::LoggedOut);
        debug!("logged out");
        Ok(())
    }

    /// Listen for the client's expiry signal and force a logout when it
    /// fires. The client has already cleared the stored session at that
    /// point; this applies the state transition.
    pub fn spawn_expiry_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        let mut signal = manager.client.session().subscribe();
        tokio::spawn(async move {
            while signal.changed().await.is_ok() {
                if *signal.borrow() == SessionSignal::Expired {
                    warn!("session expired, forcing logout");
                    manager
                        .error
                        .send_replace(Some("Your session has expired. Please sign in again.".into()));
                    manager.state.send_replace(SessionState::RefreshFailed);
                }
            }
        })
    }

    // ── State observation ───────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        match &*self.state.borrow() {
            SessionState::LoggedIn { user } => Some(user.clone()),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn watch_error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }
}
