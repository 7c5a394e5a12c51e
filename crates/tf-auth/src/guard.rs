//! Route guard
//!
//! Decides admission for each navigation attempt. Decisions are pure; the
//! caller performs any redirect.

use tf_core::config::RoutesConfig;

use crate::permissions::{is_permitted, RouteRequirement};
use crate::routes::{RouteAccess, RouteMatch, RouteTable};
use crate::session::{Session, SessionState};

/// Admission decision for a protected view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Session not resolved yet; render a neutral loading state and retry
    Pending,
    /// Nobody signed in
    DeniedAnonymous,
    /// Signed in, but the role is not in the requirement's set
    DeniedRoleMismatch,
    Admitted,
}

/// Where a denied navigation should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    Login,
    Landing,
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }

    pub fn redirect_target(&self) -> Option<RedirectTarget> {
        match self {
            Admission::DeniedAnonymous => Some(RedirectTarget::Login),
            Admission::DeniedRoleMismatch => Some(RedirectTarget::Landing),
            Admission::Pending | Admission::Admitted => None,
        }
    }
}

/// Decide admission of `session` to a view guarded by `requirement`
pub fn evaluate(session: &Session, requirement: &RouteRequirement) -> Admission {
    match session.state() {
        SessionState::Pending => Admission::Pending,
        SessionState::Anonymous => Admission::DeniedAnonymous,
        SessionState::Authenticated(identity) => {
            if is_permitted(identity.role, requirement) {
                Admission::Admitted
            } else {
                Admission::DeniedRoleMismatch
            }
        }
    }
}

/// Outcome of resolving a path for the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation<'a> {
    /// Show the view
    Render(RouteMatch<'a>),
    /// Session still resolving
    Pending,
    /// Go elsewhere; `from` is the destination to resume after login
    Redirect { to: String, from: Option<String> },
    NotFound,
}

/// Route table plus the configured redirect targets
#[derive(Debug, Clone)]
pub struct RouteGuard {
    table: RouteTable,
    config: RoutesConfig,
}

impl RouteGuard {
    pub fn new(table: RouteTable, config: RoutesConfig) -> Self {
        Self { table, config }
    }

    /// Guard over the TaskFlow route table
    pub fn taskflow(config: RoutesConfig) -> Self {
        Self::new(RouteTable::taskflow(), config)
    }

    pub fn target_path(&self, target: RedirectTarget) -> &str {
        match target {
            RedirectTarget::Login => &self.config.login_path,
            RedirectTarget::Landing => &self.config.landing_path,
        }
    }

    /// Resolve a navigation to `path`
    pub fn navigate(&self, session: &Session, path: &str) -> Navigation<'_> {
        let Some(matched) = self.table.match_path(path) else {
            tracing::debug!(path = %path, "No route");
            return Navigation::NotFound;
        };

        let route = matched.route;
        let requirement = match &route.access {
            RouteAccess::Public => return Navigation::Render(matched),
            RouteAccess::Landing => {
                return Navigation::Redirect {
                    to: self.target_path(RedirectTarget::Landing).to_string(),
                    from: None,
                }
            }
            RouteAccess::Protected(requirement) => requirement,
        };

        match evaluate(session, requirement) {
            Admission::Pending => Navigation::Pending,
            Admission::Admitted => Navigation::Render(matched),
            Admission::DeniedAnonymous => {
                tracing::debug!(path = %matched.path, "Redirecting anonymous visitor to login");
                Navigation::Redirect {
                    to: self.target_path(RedirectTarget::Login).to_string(),
                    from: Some(matched.path),
                }
            }
            Admission::DeniedRoleMismatch => {
                tracing::info!(
                    path = %matched.path,
                    role = ?session.role(),
                    "Role not permitted, redirecting to landing"
                );
                Navigation::Redirect {
                    to: self.target_path(RedirectTarget::Landing).to_string(),
                    from: None,
                }
            }
        }
    }

    /// Where to go after a successful login.
    ///
    /// Resumes the remembered destination when it names a protected view,
    /// otherwise lands on the default view.
    pub fn return_to(&self, from: Option<&str>) -> String {
        from.and_then(|path| self.table.match_path(path))
            .filter(|matched| matches!(matched.route.access, RouteAccess::Protected(_)))
            .map(|matched| matched.path)
            .unwrap_or_else(|| self.target_path(RedirectTarget::Landing).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_models::{IdentityDirectory, Role};

    const STAFF: &[Role] = &[Role::Admin, Role::Manager];

    fn signed_in(email: &str) -> Session {
        let identity = IdentityDirectory::seeded()
            .find_by_email(email)
            .cloned()
            .unwrap();
        Session::authenticated(identity)
    }

    fn guard() -> RouteGuard {
        RouteGuard::taskflow(RoutesConfig::default())
    }

    #[test]
    fn test_pending_for_any_requirement() {
        let session = Session::pending();
        for requirement in [
            RouteRequirement::any(),
            RouteRequirement::roles(STAFF),
            RouteRequirement::from_roles(Vec::new()),
        ] {
            assert_eq!(evaluate(&session, &requirement), Admission::Pending);
        }
    }

    #[test]
    fn test_anonymous_denied() {
        let decision = evaluate(&Session::anonymous(), &RouteRequirement::any());
        assert_eq!(decision, Admission::DeniedAnonymous);
        assert_eq!(decision.redirect_target(), Some(RedirectTarget::Login));
    }

    #[test]
    fn test_role_mismatch_goes_to_landing() {
        let decision = evaluate(
            &signed_in("employee@example.com"),
            &RouteRequirement::roles(STAFF),
        );
        assert_eq!(decision, Admission::DeniedRoleMismatch);
        assert_eq!(decision.redirect_target(), Some(RedirectTarget::Landing));
        assert_eq!(guard().target_path(RedirectTarget::Landing), "/dashboard");
    }

    #[test]
    fn test_admitted() {
        let decision = evaluate(&signed_in("manager@example.com"), &RouteRequirement::roles(STAFF));
        assert!(decision.is_admitted());
        assert_eq!(decision.redirect_target(), None);

        assert!(evaluate(&signed_in("employee@example.com"), &RouteRequirement::any()).is_admitted());
    }

    #[test]
    fn test_navigate_public_routes_without_session() {
        let guard = guard();
        for path in ["/login", "/register", "/forgot-password"] {
            assert!(matches!(
                guard.navigate(&Session::pending(), path),
                Navigation::Render(_)
            ));
            assert!(matches!(
                guard.navigate(&Session::anonymous(), path),
                Navigation::Render(_)
            ));
        }
    }

    #[test]
    fn test_navigate_remembers_destination() {
        let guard = guard();
        assert_eq!(
            guard.navigate(&Session::anonymous(), "/tasks/7?tab=comments"),
            Navigation::Redirect {
                to: "/login".to_string(),
                from: Some("/tasks/7".to_string()),
            }
        );
    }

    #[test]
    fn test_navigate_pending() {
        assert_eq!(
            guard().navigate(&Session::pending(), "/settings"),
            Navigation::Pending
        );
    }

    #[test]
    fn test_navigate_role_gated_views() {
        let guard = guard();
        let employee = signed_in("employee@example.com");
        let manager = signed_in("manager@example.com");
        let admin = signed_in("admin@example.com");

        let to_landing = Navigation::Redirect {
            to: "/dashboard".to_string(),
            from: None,
        };

        assert_eq!(guard.navigate(&employee, "/tasks/new"), to_landing);
        assert_eq!(guard.navigate(&employee, "/tasks/3/edit"), to_landing);
        assert_eq!(guard.navigate(&manager, "/settings"), to_landing);

        match guard.navigate(&manager, "/tasks/3/edit") {
            Navigation::Render(matched) => assert_eq!(matched.param("id"), Some("3")),
            other => panic!("Expected render, got {:?}", other),
        }
        assert!(matches!(guard.navigate(&admin, "/settings"), Navigation::Render(_)));
        assert!(matches!(guard.navigate(&employee, "/tasks/3"), Navigation::Render(_)));
    }

    #[test]
    fn test_navigate_root_and_unknown() {
        let guard = guard();
        assert_eq!(
            guard.navigate(&Session::anonymous(), "/"),
            Navigation::Redirect {
                to: "/dashboard".to_string(),
                from: None,
            }
        );
        assert_eq!(
            guard.navigate(&signed_in("admin@example.com"), "/reports"),
            Navigation::NotFound
        );
    }

    #[test]
    fn test_return_to() {
        let guard = guard();
        assert_eq!(guard.return_to(Some("/tasks/9")), "/tasks/9");
        assert_eq!(guard.return_to(None), "/dashboard");
        assert_eq!(guard.return_to(Some("/login")), "/dashboard");
        assert_eq!(guard.return_to(Some("/unknown")), "/dashboard");
    }

    #[test]
    fn test_configured_targets() {
        let guard = RouteGuard::taskflow(RoutesConfig {
            login_path: "/sign-in".to_string(),
            landing_path: "/tasks".to_string(),
        });
        assert_eq!(
            guard.navigate(&Session::anonymous(), "/chat"),
            Navigation::Redirect {
                to: "/sign-in".to_string(),
                from: Some("/chat".to_string()),
            }
        );
        assert_eq!(guard.return_to(None), "/tasks");
    }
}
