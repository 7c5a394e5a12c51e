//! # tf-auth
//!
//! Client-side authentication and authorization for TaskFlow.
//!
//! ## Features
//!
//! - Role model with route requirements and action capabilities
//! - Session store persisted through a key-value side channel
//! - Auth service: login, logout, registration, identity updates
//! - Route table and navigation guard

pub mod contracts;
pub mod guard;
pub mod permissions;
pub mod routes;
pub mod service;
pub mod session;
pub mod storage;

pub use contracts::{LoginForm, RegistrationForm, ValidRegistration};
pub use guard::{evaluate, Admission, Navigation, RedirectTarget, RouteGuard};
pub use permissions::{is_permitted, permits, Capability, RouteRequirement};
pub use routes::{nav_items, visible_nav_items, NavItem, Route, RouteAccess, RouteMatch, RouteTable};
pub use service::{AuthError, AuthResult, AuthService, LoginOutcome, RegisterOutcome, UpdateOutcome};
pub use session::{decode_record, RecordError, Session, SessionError, SessionState, SessionStore};
pub use storage::{open_storage, FileStorage, MemoryStorage, SessionStorage, StorageError};
