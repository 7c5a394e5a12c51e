//! Known identity set
//!
//! Credentials are checked against this directory. The seeded directory
//! carries the three demo accounts, one per role.

use chrono::{TimeZone, Utc};

use crate::identity::Identity;
use crate::role::Role;

#[derive(Debug, Clone, Default)]
pub struct IdentityDirectory {
    identities: Vec<Identity>,
}

impl IdentityDirectory {
    pub fn new(identities: Vec<Identity>) -> Self {
        Self { identities }
    }

    /// The demo accounts: admin, manager and employee at example.com
    pub fn seeded() -> Self {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_else(Utc::now);
        let seed = |id: &str, name: &str, email: &str, role: Role, department: &str| Identity {
            created_at,
            ..Identity::new(id, name, email, role).with_department(department)
        };

        Self::new(vec![
            seed("1", "Admin User", "admin@example.com", Role::Admin, "Management"),
            seed("2", "Manager User", "manager@example.com", Role::Manager, "Engineering"),
            seed("3", "Employee User", "employee@example.com", Role::Employee, "Engineering"),
        ])
    }

    /// Exact, case-sensitive lookup
    pub fn find_by_email(&self, email: &str) -> Option<&Identity> {
        self.identities.iter().find(|identity| identity.email == email)
    }

    pub fn contains_email(&self, email: &str) -> bool {
        self.find_by_email(email).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.identities.iter()
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}
