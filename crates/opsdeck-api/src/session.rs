// Session state and persistence boundary.
//
// The client's only side effects beyond network I/O are reads and writes
// of the persisted session, so the session context lives next to it.
// `SessionHandle` is the in-memory authority; a `SessionStore`
// implementation mirrors it to durable storage. Every write is checked
// against a generation counter so that a logout always wins over any
// concurrently-resolving login or token refresh.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::Error;

// ── Persisted shapes ────────────────────────────────────────────────

/// Profile fields returned by the auth endpoints and persisted across
/// restarts alongside the token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl UserProfile {
    /// Display name composed from the profile's name fields.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Access + refresh token pair. Serialized field names match the wire
/// contract of the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "token")]
    pub access: String,
    #[serde(rename = "refreshToken")]
    pub refresh: String,
}

/// The full persisted session: exactly the user profile plus the token
/// pair, stored and cleared as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub user: UserProfile,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

// ── Persistence trait ───────────────────────────────────────────────

/// Durable storage for the session snapshot.
///
/// Implementations must treat the snapshot atomically: `save` replaces
/// whatever was stored, `clear` removes everything.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<SessionSnapshot>, Error>;
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), Error>;
    fn clear(&self) -> Result<(), Error>;
}

/// In-memory `SessionStore` for tests and sessions that should not
/// outlive the process.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<SessionSnapshot>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store, e.g. to simulate a previously persisted session.
    pub fn with_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            slot: RwLock::new(Some(snapshot)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionSnapshot>, Error> {
        Ok(self.slot.read().expect("session store lock poisoned").clone())
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), Error> {
        *self.slot.write().expect("session store lock poisoned") = Some(snapshot.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.slot.write().expect("session store lock poisoned") = None;
        Ok(())
    }
}

// ── Signals ─────────────────────────────────────────────────────────

/// Broadcast to session observers when the client invalidates the
/// session (refresh failure or a 401 that survived the refresh).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    /// Session installed or still usable.
    Active,
    /// Session irrecoverably expired; observers should force a logout.
    Expired,
}

// ── Handle ──────────────────────────────────────────────────────────

struct SessionCell {
    snapshot: Option<SessionSnapshot>,
    /// Bumped on every login start and every clear. Writes carrying a
    /// stale generation are discarded.
    generation: u64,
}

struct SessionInner {
    cell: RwLock<SessionCell>,
    store: Box<dyn SessionStore>,
    signal: watch::Sender<SessionSignal>,
}

/// Shared, thread-safe session context injected into the client and the
/// session manager. Cheap to clone.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<SessionInner>,
}

impl SessionHandle {
    pub fn new(store: Box<dyn SessionStore>) -> Self {
        let (signal, _) = watch::channel(SessionSignal::Active);
        Self {
            inner: Arc::new(SessionInner {
                cell: RwLock::new(SessionCell {
                    snapshot: None,
                    generation: 0,
                }),
                store,
                signal,
            }),
        }
    }

    /// Convenience constructor backed by a fresh [`MemorySessionStore`].
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemorySessionStore::new()))
    }

    /// Load the persisted snapshot into memory, returning the stored
    /// profile if one was found. Rehydration is optimistic: the stored
    /// tokens are trusted until the server rejects them.
    pub fn bootstrap(&self) -> Result<Option<UserProfile>, Error> {
        let loaded = self.inner.store.load()?;
        let mut cell = self.write_cell();
        cell.snapshot = loaded;
        Ok(cell.snapshot.as_ref().map(|s| s.user.clone()))
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn access_token(&self) -> Option<String> {
        self.read_cell(|c| c.snapshot.as_ref().map(|s| s.tokens.access.clone()))
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read_cell(|c| c.snapshot.as_ref().map(|s| s.tokens.refresh.clone()))
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read_cell(|c| c.snapshot.as_ref().map(|s| s.user.clone()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_cell(|c| c.snapshot.is_some())
    }

    /// The current session generation. Capture before an async auth
    /// operation; pass back to [`install`](Self::install) or
    /// [`replace_tokens`](Self::replace_tokens) so stale results are
    /// discarded.
    pub fn generation(&self) -> u64 {
        self.read_cell(|c| c.generation)
    }

    /// Subscribe to session invalidation signals.
    pub fn subscribe(&self) -> watch::Receiver<SessionSignal> {
        self.inner.signal.subscribe()
    }

    // ── Writes (generation-checked) ─────────────────────────────────

    /// Mark the start of a login attempt. Bumps the generation so any
    /// earlier in-flight attempt can no longer install its result, and
    /// returns the generation the new attempt must present.
    pub fn begin_login(&self) -> u64 {
        let mut cell = self.write_cell();
        cell.generation += 1;
        cell.generation
    }

    /// Install a freshly authenticated session. Returns `Ok(false)` if
    /// `generation` is stale (a logout or newer login happened in the
    /// meantime); the snapshot is then dropped without persisting.
    pub fn install(&self, generation: u64, snapshot: SessionSnapshot) -> Result<bool, Error> {
        let mut cell = self.write_cell();
        if cell.generation != generation {
            debug!("discarding login result from stale session generation");
            return Ok(false);
        }
        self.inner.store.save(&snapshot)?;
        cell.snapshot = Some(snapshot);
        let _ = self.inner.signal.send(SessionSignal::Active);
        Ok(true)
    }

    /// Swap in a refreshed token pair, keeping the stored user. Returns
    /// `Ok(false)` when the generation is stale or no session exists —
    /// the refreshed tokens are then dropped.
    pub fn replace_tokens(&self, generation: u64, tokens: TokenPair) -> Result<bool, Error> {
        let mut cell = self.write_cell();
        if cell.generation != generation {
            debug!("discarding refreshed tokens from stale session generation");
            return Ok(false);
        }
        let Some(snapshot) = cell.snapshot.as_mut() else {
            return Ok(false);
        };
        snapshot.tokens = tokens;
        self.inner.store.save(snapshot)?;
        Ok(true)
    }

    /// Clear the session: bumps the generation, wipes memory, and
    /// removes the persisted snapshot. Used by user-initiated logout.
    pub fn clear(&self) -> Result<(), Error> {
        let mut cell = self.write_cell();
        cell.generation += 1;
        cell.snapshot = None;
        self.inner.store.clear()
    }

    /// Clear the session and broadcast [`SessionSignal::Expired`]. Used
    /// by the client when a refresh fails or a replayed request is still
    /// rejected. Storage failures are logged rather than propagated --
    /// the in-memory session is gone either way.
    pub fn expire(&self) {
        {
            let mut cell = self.write_cell();
            cell.generation += 1;
            cell.snapshot = None;
        }
        if let Err(e) = self.inner.store.clear() {
            warn!(error = %e, "failed to clear persisted session on expiry");
        }
        let _ = self.inner.signal.send(SessionSignal::Expired);
    }

    // ── Lock helpers ────────────────────────────────────────────────

    fn read_cell<T>(&self, f: impl FnOnce(&SessionCell) -> T) -> T {
        f(&self.inner.cell.read().expect("session lock poisoned"))
    }

    fn write_cell(&self) -> std::sync::RwLockWriteGuard<'_, SessionCell> {
        self.inner.cell.write().expect("session lock poisoned")
    }
}
