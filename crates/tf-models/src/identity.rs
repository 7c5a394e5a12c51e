//! Identity model
//!
//! The user record a session wraps. Its serialized form is also the
//! persisted session record, so the serde layout is part of the on-disk
//! format: `{ id, name, email, role, department?, createdAt }`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::role::Role;

/// Longest display name a persisted identity may carry
pub const NAME_MAX_LENGTH: usize = 255;

/// Identity entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Unique identifier
    #[validate(length(min = 1, message = "can't be blank"))]
    pub id: String,

    /// Display name
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub name: String,

    /// Email address (unique within the known identity set)
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    pub role: Role,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
            department: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Build a fresh identity with a generated id and the current timestamp
    pub fn register(new: NewIdentity) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name,
            email: new.email,
            role: new.role,
            department: new.department,
            created_at: Utc::now(),
        }
    }

    /// Merge the set fields of `patch` into this identity.
    ///
    /// Only name, department and role are mutable; id, email and creation
    /// time never change.
    pub fn apply(&mut self, patch: UpdateIdentity) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(department) = patch.department {
            self.department = Some(department);
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }
}

/// Identity creation parameters
#[derive(Debug, Clone, Deserialize)]
pub struct NewIdentity {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
}

/// Identity update parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateIdentity {
    pub name: Option<String>,
    pub department: Option<String>,
    pub role: Option<Role>,
}

impl UpdateIdentity {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}
