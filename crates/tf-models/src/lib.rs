//! # tf-models
//!
//! Domain models for TaskFlow.
//!
//! Identities, the closed role set, and the seeded directory of identities
//! the auth service authenticates against.

pub mod directory;
pub mod identity;
pub mod role;

pub use directory::IdentityDirectory;
pub use identity::{Identity, NewIdentity, UpdateIdentity, NAME_MAX_LENGTH};
pub use role::{Role, UnknownRole};
