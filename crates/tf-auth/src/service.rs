//! Authentication service
//!
//! Login, logout, registration and identity updates on top of the
//! [`SessionStore`]. Expected denials are returned as outcomes; only
//! persistence faults surface as [`AuthError`].

use thiserror::Error;
use tf_core::config::{AppConfig, AuthConfig};
use tf_core::error::ValidationErrors;
use tf_models::{Identity, IdentityDirectory, NewIdentity, Role, UpdateIdentity};

use crate::contracts::{LoginForm, RegistrationForm};
use crate::session::{Session, SessionError, SessionStore};
use crate::storage::open_storage;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Session persistence failed: {0}")]
    Session(#[from] SessionError),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Result of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials accepted
    Authenticated(Session),
    /// Unknown email or wrong password; the two are indistinguishable
    Denied,
    /// The form was rejected before any lookup
    Invalid(ValidationErrors),
}

impl LoginOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated(_))
    }
}

/// Result of a registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered(Session),
    Rejected(ValidationErrors),
}

/// Result of an identity update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Patch applied and persisted
    Updated(Session),
    /// Nobody signed in; nothing changed
    Ignored(Session),
    /// The patched identity is not a valid record; nothing changed
    Rejected(ValidationErrors),
}

/// Authentication service owning the client session
pub struct AuthService {
    store: SessionStore,
    directory: IdentityDirectory,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(store: SessionStore, directory: IdentityDirectory, config: AuthConfig) -> Self {
        Self {
            store,
            directory,
            config,
        }
    }

    /// Wire the configured storage backend and the seeded directory
    pub fn from_config(config: &AppConfig) -> Self {
        let storage = open_storage(&config.session);
        let store = SessionStore::new(storage, config.session.storage_key.clone());
        Self::new(store, IdentityDirectory::seeded(), config.auth.clone())
    }

    pub fn session(&self) -> &Session {
        self.store.session()
    }

    pub fn directory(&self) -> &IdentityDirectory {
        &self.directory
    }

    /// Resolve the pending session from persisted state
    pub fn restore(&mut self) -> &Session {
        self.store.restore()
    }

    /// Authenticate against the known identity set.
    ///
    /// The email must match exactly and the password must equal the shared
    /// password. A denial leaves both memory and storage untouched.
    pub fn login(&mut self, email: &str, password: &str) -> AuthResult<LoginOutcome> {
        let identity = match self.directory.find_by_email(email) {
            Some(identity) if password == self.config.shared_password => identity.clone(),
            _ => {
                tracing::debug!("Login denied");
                return Ok(LoginOutcome::Denied);
            }
        };

        let session = self.store.persist(identity)?;
        if let Some(identity) = session.identity() {
            tracing::info!(user_id = %identity.id, role = %identity.role, "Logged in");
        }
        Ok(LoginOutcome::Authenticated(session.clone()))
    }

    /// Validate the form, then [`login`](Self::login)
    pub fn submit_login(&mut self, form: &LoginForm) -> AuthResult<LoginOutcome> {
        if let Err(errors) = form.validate() {
            return Ok(LoginOutcome::Invalid(errors));
        }
        self.login(&form.email, &form.password)
    }

    /// Drop to anonymous and delete the persisted record. Idempotent.
    pub fn logout(&mut self) -> AuthResult<&Session> {
        let was_authenticated = self.store.session().is_authenticated();
        let session = self.store.clear()?;
        if was_authenticated {
            tracing::info!("Logged out");
        }
        Ok(session)
    }

    /// Create an identity and sign it in.
    ///
    /// Passwords are not stored: registered identities are not added to the
    /// known identity set. Email uniqueness is only checked when
    /// `enforce_unique_email` is set.
    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        _password: &str,
        role: Role,
    ) -> AuthResult<RegisterOutcome> {
        if self.config.enforce_unique_email && self.directory.contains_email(email) {
            let mut errors = ValidationErrors::new();
            errors.add("email", "has already been taken");
            tracing::info!(email = %email, "Registration rejected: email taken");
            return Ok(RegisterOutcome::Rejected(errors));
        }

        let identity = Identity::register(NewIdentity {
            name: name.to_string(),
            email: email.to_string(),
            role,
            department: None,
        });

        match self.store.persist(identity) {
            Ok(session) => {
                if let Some(identity) = session.identity() {
                    tracing::info!(user_id = %identity.id, role = %identity.role, "Registered");
                }
                Ok(RegisterOutcome::Registered(session.clone()))
            }
            Err(SessionError::Invalid(errors)) => {
                tracing::debug!(fields = ?errors.errors.keys().collect::<Vec<_>>(), "Registration rejected");
                Ok(RegisterOutcome::Rejected(errors))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Validate the form, then [`register`](Self::register)
    pub fn submit_registration(&mut self, form: &RegistrationForm) -> AuthResult<RegisterOutcome> {
        match form.validate(&self.config) {
            Ok(valid) => self.register(&valid.name, &valid.email, &valid.password, valid.role),
            Err(errors) => Ok(RegisterOutcome::Rejected(errors)),
        }
    }

    /// Merge `patch` into the signed-in identity and re-persist it.
    ///
    /// No-op while anonymous or pending. A patch that would make the
    /// identity invalid is rejected and the current identity is kept.
    pub fn update_identity(&mut self, patch: UpdateIdentity) -> AuthResult<UpdateOutcome> {
        let Some(mut identity) = self.store.session().identity().cloned() else {
            tracing::debug!("Identity update ignored without a signed-in identity");
            return Ok(UpdateOutcome::Ignored(self.store.session().clone()));
        };

        identity.apply(patch);
        let user_id = identity.id.clone();
        match self.store.persist(identity) {
            Ok(session) => {
                tracing::info!(user_id = %user_id, "Updated identity");
                Ok(UpdateOutcome::Updated(session.clone()))
            }
            Err(SessionError::Invalid(errors)) => {
                tracing::debug!(user_id = %user_id, "Identity update rejected");
                Ok(UpdateOutcome::Rejected(errors))
            }
            Err(e) => Err(e.into()),
        }
    }
}
