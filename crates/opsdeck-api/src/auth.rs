// Authentication endpoints.
//
// Login and register are dispatched without a bearer header -- a 401
// there means bad credentials, not an expired session. Token refresh is
// internal to the client's dispatch pipeline and has no public surface.

use secrecy::{ExposeSecret, SecretString};

use crate::client::BackofficeClient;
use crate::error::Error;
use crate::session::UserProfile;
use crate::types::{AuthResponse, LoginRequest, RegisterRequest};

impl BackofficeClient {
    /// Authenticate with username/email and password.
    ///
    /// Returns the token pair and profile; the caller (the session
    /// manager) decides whether to install them.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, Error> {
        self.post_unauthenticated(
            "api/auth/login",
            &LoginRequest {
                username,
                password: password.expose_secret(),
            },
        )
        .await
    }

    /// Register a new account. Does not log the account in.
    pub async fn register(&self, body: &RegisterRequest) -> Result<AuthResponse, Error> {
        self.post_unauthenticated("api/auth/register", body).await
    }

    /// Fetch the profile of the currently authenticated user.
    pub async fn current_user(&self) -> Result<UserProfile, Error> {
        self.get("api/auth/me").await
    }
}
