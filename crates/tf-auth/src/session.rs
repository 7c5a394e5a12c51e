//! Session state and its persistence
//!
//! A [`SessionStore`] owns the one session of a running client. It starts
//! pending, is resolved by [`SessionStore::restore`], and every later
//! transition writes the persisted record before touching memory.

use std::sync::Arc;
use thiserror::Error;
use tf_core::error::ValidationErrors;
use tf_models::{Identity, Role};
use validator::Validate;

use crate::storage::{SessionStorage, StorageError};

/// Session state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Persisted state has not been checked yet
    #[default]
    Pending,
    /// Resolved, nobody signed in
    Anonymous,
    /// Resolved, signed in
    Authenticated(Identity),
}

/// The current authentication state of the client
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    /// Unresolved session, as created at startup
    pub fn pending() -> Self {
        Self {
            state: SessionState::Pending,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            state: SessionState::Anonymous,
        }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            state: SessionState::Authenticated(identity),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Check if the session is still being determined
    pub fn is_pending(&self) -> bool {
        matches!(self.state, SessionState::Pending)
    }

    /// Check if this is an authenticated session
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    /// Resolved with nobody signed in
    pub fn is_anonymous(&self) -> bool {
        matches!(self.state, SessionState::Anonymous)
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|identity| identity.role)
    }
}

/// Why a persisted record was rejected
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Record is not a valid identity: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Record failed validation: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Decode and structurally validate a persisted identity record
pub fn decode_record(raw: &str) -> Result<Identity, RecordError> {
    let identity: Identity = serde_json::from_str(raw)?;
    identity.validate()?;
    Ok(identity)
}

/// Single owner of the client session and its persisted record
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    key: String,
    session: Session,
}

impl SessionStore {
    /// Create a store with a pending session
    pub fn new(storage: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            session: Session::pending(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Resolve the session from the persisted record.
    ///
    /// Never fails: an unreadable or malformed record resolves to anonymous,
    /// and a malformed one is deleted.
    pub fn restore(&mut self) -> &Session {
        let raw = match self.storage.get(&self.key) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read session record");
                None
            }
        };

        self.session = match raw {
            None => {
                tracing::debug!(key = %self.key, "No persisted session");
                Session::anonymous()
            }
            Some(raw) => match decode_record(&raw) {
                Ok(identity) => {
                    tracing::info!(user_id = %identity.id, role = %identity.role, "Restored session");
                    Session::authenticated(identity)
                }
                Err(e) => {
                    tracing::warn!(key = %self.key, error = %e, "Discarding corrupt session record");
                    if let Err(e) = self.storage.remove(&self.key) {
                        tracing::error!(key = %self.key, error = %e, "Failed to delete corrupt session record");
                    }
                    Session::anonymous()
                }
            },
        };

        &self.session
    }

    /// Write `identity` as the sole record, then authenticate with it.
    ///
    /// The identity must pass the same checks [`decode_record`] applies on
    /// restore; a rejected identity leaves storage and session untouched.
    pub fn persist(&mut self, identity: Identity) -> Result<&Session, SessionError> {
        identity.validate().map_err(ValidationErrors::from)?;
        let raw = serde_json::to_string(&identity)?;
        self.storage.set(&self.key, &raw)?;
        self.session = Session::authenticated(identity);
        Ok(&self.session)
    }

    /// Delete the record, then drop to anonymous
    pub fn clear(&mut self) -> Result<&Session, SessionError> {
        self.storage.remove(&self.key)?;
        self.session = Session::anonymous();
        Ok(&self.session)
    }
}

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to encode session record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Identity rejected: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
