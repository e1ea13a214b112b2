//! Session store: the single source of truth for who is logged in.
//!
//! The store is owned by the application context and shared with the API
//! client and the pages through `Arc`. Reads are synchronous snapshots;
//! every mutation is published to observers as one atomic replace.

mod storage;

pub use storage::{
    FileStorage, MemoryStorage, SessionStorage, StorageError, IDENTITY_KEY, SESSION_FILE,
    TOKEN_KEY,
};

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

use crate::api::ClientError;
use crate::models::{Credentials, Identity, LoginResponse, Role};

/// An authenticated session. Holding one means both the token and the
/// identity are known.
#[derive(Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
}

impl Session {
    pub fn role(&self) -> Role {
        self.identity.role
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("identity", &self.identity)
            .finish()
    }
}

/// Exchanges credentials for a token and an identity
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError>;
}

/// What the request layer needs from the session
pub trait CredentialProvider: Send + Sync {
    /// Token to attach as a bearer credential, if a session exists
    fn bearer_token(&self) -> Option<String>;

    /// The server rejected `token`; the session holding it must end.
    ///
    /// Returns `true` when `token` was the current credential and the
    /// session was ended, `false` when a newer session has replaced it.
    fn credential_rejected(&self, token: &str) -> Result<bool, StorageError>;
}

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    state: watch::Sender<Option<Session>>,
}

impl SessionStore {
    /// Create an unauthenticated store. Call [`SessionStore::initialize`] to
    /// rehydrate a persisted session.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (state, _) = watch::channel(None);
        Self { storage, state }
    }

    /// Rehydrate the session persisted by an earlier run.
    ///
    /// No request is made: the server re-validates the token on every call,
    /// and the first rejection ends the session. A token without a readable
    /// identity (or the reverse) is discarded.
    #[instrument(skip(self))]
    pub fn initialize(&self) -> Result<Option<Identity>, StorageError> {
        let session = match self.load_persisted() {
            Ok(session) => session,
            Err(StorageError::Corrupt { path, source }) => {
                warn!(path = %path.display(), error = %source, "Discarding unreadable session file");
                self.storage.remove_entries(&[TOKEN_KEY, IDENTITY_KEY])?;
                None
            }
            Err(e) => return Err(e),
        };

        let identity = session.as_ref().map(|s| s.identity.clone());
        match &identity {
            Some(identity) => info!(
                user_id = identity.id,
                role = %identity.role,
                "Restored persisted session"
            ),
            None => debug!("No persisted session"),
        }
        self.state.send_replace(session);
        Ok(identity)
    }

    fn load_persisted(&self) -> Result<Option<Session>, StorageError> {
        let token = self.storage.get(TOKEN_KEY)?;
        let identity = self.storage.get(IDENTITY_KEY)?;

        match (token, identity) {
            (None, None) => Ok(None),
            (Some(Value::String(token)), Some(identity)) if !token.is_empty() => {
                match serde_json::from_value::<Identity>(identity) {
                    Ok(identity) => Ok(Some(Session { token, identity })),
                    Err(e) => {
                        warn!(error = %e, "Cached identity is unreadable, discarding session");
                        self.storage.remove_entries(&[TOKEN_KEY, IDENTITY_KEY])?;
                        Ok(None)
                    }
                }
            }
            _ => {
                warn!("Discarding partial persisted session");
                self.storage.remove_entries(&[TOKEN_KEY, IDENTITY_KEY])?;
                Ok(None)
            }
        }
    }

    /// Log in with the given credentials.
    ///
    /// On success the token and identity are persisted first and then
    /// published. On failure the current state is left untouched and the
    /// error is returned for display.
    #[instrument(skip(self, authenticator, credentials), fields(email = %credentials.email))]
    pub async fn login<A>(
        &self,
        authenticator: &A,
        credentials: &Credentials,
    ) -> Result<Identity, ClientError>
    where
        A: Authenticator + ?Sized,
    {
        let LoginResponse { token, identity } = authenticator.authenticate(credentials).await?;

        if token.trim().is_empty() {
            warn!("Login response carried an empty token");
            return Err(ClientError::MalformedResponse(
                "login response carried an empty token".to_string(),
            ));
        }

        let cached = serde_json::to_value(&identity)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        self.storage.set_entries(vec![
            (TOKEN_KEY, Value::String(token.clone())),
            (IDENTITY_KEY, cached),
        ])?;

        info!(user_id = identity.id, role = %identity.role, "Logged in");
        self.state.send_replace(Some(Session {
            token,
            identity: identity.clone(),
        }));
        Ok(identity)
    }

    /// End the session. Safe to call when already logged out.
    ///
    /// The in-memory session is always cleared. An error means the persisted
    /// copy could not be removed and would be restored by the next
    /// [`SessionStore::initialize`]; calling again retries the removal.
    pub fn logout(&self) -> Result<(), StorageError> {
        let mut previous = None;
        self.state.send_if_modified(|state| {
            previous = state.take();
            previous.is_some()
        });

        if let Some(session) = previous {
            info!(user_id = session.identity.id, "Logged out");
        }

        self.storage
            .remove_entries(&[TOKEN_KEY, IDENTITY_KEY])
            .map_err(|e| {
                error!(error = %e, "Failed to clear persisted session");
                e
            })
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    /// Snapshot of the authenticated identity
    pub fn current_identity(&self) -> Option<Identity> {
        self.state.borrow().as_ref().map(|s| s.identity.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Observe session changes. The receiver sees the state current at the
    /// time of each change, never an intermediate one.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }
}

impl CredentialProvider for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|s| s.token.clone())
    }

    fn credential_rejected(&self, token: &str) -> Result<bool, StorageError> {
        let current = self.bearer_token();
        // A late rejection of an older token must not end a newer session.
        if current.as_deref() == Some(token) {
            warn!("Server rejected the session token, logging out");
            self.logout()?;
            Ok(true)
        } else {
            debug!("Ignoring rejection of a token that is no longer current");
            Ok(false)
        }
    }
}
