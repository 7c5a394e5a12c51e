//! Permission system for TaskFlow
//!
//! Authorization is role-set membership: a requirement either admits any
//! authenticated identity or lists the roles it admits.

use std::borrow::Cow;
use tf_models::Role;

// ============================================================================
// Route Requirement
// ============================================================================

/// Role restriction attached to a navigable view or an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequirement {
    roles: Option<Cow<'static, [Role]>>,
}

impl RouteRequirement {
    /// Any authenticated identity is admitted
    pub const fn any() -> Self {
        Self { roles: None }
    }

    /// Only the listed roles are admitted
    pub const fn roles(roles: &'static [Role]) -> Self {
        Self {
            roles: Some(Cow::Borrowed(roles)),
        }
    }

    /// Owned variant of [`RouteRequirement::roles`]
    pub fn from_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: Some(Cow::Owned(roles.into_iter().collect())),
        }
    }

    /// The admitted roles, `None` when unrestricted
    pub fn allowed_roles(&self) -> Option<&[Role]> {
        self.roles.as_deref()
    }
}

impl Default for RouteRequirement {
    fn default() -> Self {
        Self::any()
    }
}

/// Whether `role` satisfies `requirement`
pub fn is_permitted(role: Role, requirement: &RouteRequirement) -> bool {
    match requirement.allowed_roles() {
        None => true,
        Some(roles) => roles.contains(&role),
    }
}

// ============================================================================
// Capabilities
// ============================================================================

const STAFF: &[Role] = &[Role::Admin, Role::Manager];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Role-gated actions the views check before offering them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    CreateTask,
    EditTask,
    DeleteTask,
    ViewAllTasks,
    ViewProjects,
    ManageTeam,
    ManageSettings,
}

impl Capability {
    pub const ALL: [Capability; 7] = [
        Capability::CreateTask,
        Capability::EditTask,
        Capability::DeleteTask,
        Capability::ViewAllTasks,
        Capability::ViewProjects,
        Capability::ManageTeam,
        Capability::ManageSettings,
    ];

    pub fn requirement(&self) -> RouteRequirement {
        match self {
            Capability::CreateTask
            | Capability::EditTask
            | Capability::ViewProjects
            | Capability::ManageTeam => RouteRequirement::roles(STAFF),
            Capability::DeleteTask | Capability::ViewAllTasks | Capability::ManageSettings => {
                RouteRequirement::roles(ADMIN_ONLY)
            }
        }
    }
}

/// Whether `role` may perform `capability`
pub fn permits(role: Role, capability: Capability) -> bool {
    is_permitted(role, &capability.requirement())
}

// ============================================================================
// Tests
// ============================================================================
