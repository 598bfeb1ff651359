// HTTP client for the Opsdeck back-office API.
//
// Wraps `reqwest::Client` with bearer-token attachment and a single
// transparent token refresh on 401. All endpoint modules (inventory,
// suppliers, etc.) are implemented as inherent methods via separate
// files to keep this module focused on transport mechanics.

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::session::{SessionHandle, TokenPair};
use crate::transport::TransportConfig;
use crate::types::{RefreshRequest, RefreshResponse};

/// Error bodies carry a human-readable `message` field when the server
/// has one to give.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Async client for the Opsdeck back-office REST API.
///
/// All requests are JSON. The client reads the current access token from
/// the injected [`SessionHandle`] and attaches it as a bearer header; a
/// 401 on an authenticated request triggers exactly one token refresh
/// followed by one replay of the original request.
pub struct BackofficeClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionHandle,
}

impl BackofficeClient {
    // ── Constructors ────────────────────────────────────────────────

    /// Build a client from a base URL, transport settings, and a shared
    /// session context.
    pub fn new(
        base_url: Url,
        transport: &TransportConfig,
        session: SessionHandle,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url),
            session,
        })
    }

    /// Wrap an existing `reqwest::Client` (used by tests).
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        session: SessionHandle,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(Url::parse(base_url)?),
            session,
        })
    }

    /// The session context this client reads tokens from.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ─────────────────────────────────────────────────

    /// Join a relative path (e.g. `"api/inventory/items"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining relative paths works.
        self.base_url
            .join(path)
            .expect("path should be a valid relative URL")
    }

    // ── HTTP verbs ──────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.dispatch(self.http.get(url)).await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url} params={params:?}");

        let resp = self.dispatch(self.http.get(url).query(params)).await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.dispatch(self.http.post(url).json(body)).await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("PUT {url}");

        let resp = self.dispatch(self.http.put(url).json(body)).await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path);
        debug!("DELETE {url}");

        let resp = self.dispatch(self.http.delete(url)).await?;
        self.handle_empty(resp).await
    }

    /// POST without bearer attachment or the refresh pipeline. Used by
    /// login/register, where a 401 means bad credentials rather than an
    /// expired session.
    pub(crate) async fn post_unauthenticated<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url} (unauthenticated)");

        let resp = self.http.post(url).json(body).send().await?;
        let status = resp.status();
        if status.is_success() {
            self.decode(resp).await
        } else {
            Err(self.parse_error(status, resp, false).await)
        }
    }

    // ── Dispatch with single-refresh retry ──────────────────────────

    /// Send a request, refreshing the access token and replaying exactly
    /// once if the server rejects it with 401. The `retried` flag is the
    /// sole guard against looping: after one refresh the 401 (if it
    /// recurs) falls through to error handling, which invalidates the
    /// session.
    async fn dispatch(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, Error> {
        let mut retried = false;
        loop {
            let attempt = builder
                .try_clone()
                .expect("request bodies are buffered JSON");
            let attempt = match self.session.access_token() {
                Some(token) => attempt.bearer_auth(token),
                None => attempt,
            };

            let resp = attempt.send().await?;

            if resp.status() == StatusCode::UNAUTHORIZED
                && !retried
                && self.session.is_authenticated()
            {
                retried = true;
                debug!("access token rejected, attempting refresh");
                self.refresh_session().await?;
                continue;
            }

            return Ok(resp);
        }
    }

    /// Exchange the stored refresh token for a new token pair.
    ///
    /// Dispatched directly through the underlying HTTP client, outside
    /// the retry pipeline. A rejected or unusable refresh clears the
    /// session and broadcasts the expiry signal; a pure network failure
    /// leaves the session intact so the caller can retry later.
    async fn refresh_session(&self) -> Result<(), Error> {
        let Some(refresh) = self.session.refresh_token() else {
            warn!("401 with no stored refresh token, forcing logout");
            self.session.expire();
            return Err(Error::Auth {
                message: "session expired".into(),
            });
        };

        let generation = self.session.generation();
        let url = self.url("api/auth/refresh-token");
        debug!("POST {url} (token refresh)");

        let resp = self
            .http
            .post(url)
            .json(&RefreshRequest {
                refresh_token: &refresh,
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            warn!(status = %resp.status(), "refresh token rejected, forcing logout");
            self.session.expire();
            return Err(Error::Auth {
                message: "session expired".into(),
            });
        }

        let Ok(tokens) = resp.json::<RefreshResponse>().await else {
            warn!("unusable refresh response, forcing logout");
            self.session.expire();
            return Err(Error::Auth {
                message: "session expired".into(),
            });
        };

        let installed = self.session.replace_tokens(
            generation,
            TokenPair {
                access: tokens.token,
                refresh: tokens.refresh_token,
            },
        )?;
        if !installed {
            // A logout won the race; the replayed request must not proceed.
            return Err(Error::Auth {
                message: "session ended during token refresh".into(),
            });
        }

        debug!("token refresh successful");
        Ok(())
    }

    // ── Response handling ───────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            self.decode(resp).await
        } else {
            Err(self.parse_error(status, resp, true).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp, true).await)
        }
    }

    async fn decode<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Decode {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Map a failure status onto the error taxonomy, extracting the
    /// server's `message` when the body carries one.
    ///
    /// When `invalidate` is set, a 401 on an authenticated session means
    /// the replayed request was still rejected -- the session is cleared
    /// and the expiry signal broadcast instead of retrying again.
    async fn parse_error(
        &self,
        status: StatusCode,
        resp: reqwest::Response,
        invalidate: bool,
    ) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.chars().take(200).collect()
                }
            });

        match status {
            StatusCode::UNAUTHORIZED => {
                if invalidate && self.session.is_authenticated() {
                    warn!("request rejected after token refresh, forcing logout");
                    self.session.expire();
                }
                Error::Auth { message }
            }
            StatusCode::NOT_FOUND => Error::NotFound { message },
            StatusCode::CONFLICT => Error::Conflict { message },
            s if s.is_server_error() => Error::Server {
                status: s.as_u16(),
                message,
            },
            s => Error::Client {
                status: s.as_u16(),
                message,
            },
        }
    }
}

/// Ensure the base URL path ends with `/` so relative joins append
/// rather than replace.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
