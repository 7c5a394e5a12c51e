//! Route table and navigation menu
//!
//! The application's navigable views, their access rules, and the sidebar
//! entries derived from them.

use std::collections::HashMap;
use tf_models::Role;

use crate::permissions::{is_permitted, RouteRequirement};

const STAFF: &[Role] = &[Role::Admin, Role::Manager];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// How a route is entered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// Reachable without a session
    Public,
    /// Requires an authenticated identity satisfying the requirement
    Protected(RouteRequirement),
    /// Forwards to the landing view
    Landing,
}

/// A navigable view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    /// Path pattern; `:name` segments match any single segment
    pub pattern: &'static str,
    pub access: RouteAccess,
}

impl Route {
    pub fn public(name: &'static str, pattern: &'static str) -> Self {
        Self {
            name,
            pattern,
            access: RouteAccess::Public,
        }
    }

    pub fn protected(name: &'static str, pattern: &'static str, requirement: RouteRequirement) -> Self {
        Self {
            name,
            pattern,
            access: RouteAccess::Protected(requirement),
        }
    }

    /// Match `path` segment-wise, returning the captured parameters and the
    /// number of literal segments matched
    fn matches(&self, segments: &[&str]) -> Option<(HashMap<String, String>, usize)> {
        let pattern: Vec<&str> = split_segments(self.pattern);
        if pattern.len() != segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        let mut literal = 0;
        for (expected, actual) in pattern.iter().zip(segments) {
            if let Some(name) = expected.strip_prefix(':') {
                params.insert(name.to_string(), (*actual).to_string());
            } else if expected == actual {
                literal += 1;
            } else {
                return None;
            }
        }
        Some((params, literal))
    }
}

/// A resolved route with its captured path parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub path: String,
    pub params: HashMap<String, String>,
}

impl RouteMatch<'_> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The TaskFlow views
    pub fn taskflow() -> Self {
        Self::new(vec![
            // Public
            Route::public("login", "/login"),
            Route::public("register", "/register"),
            Route::public("forgot_password", "/forgot-password"),
            // Protected
            Route::protected("dashboard", "/dashboard", RouteRequirement::any()),
            Route::protected("tasks", "/tasks", RouteRequirement::any()),
            Route::protected("task_new", "/tasks/new", RouteRequirement::roles(STAFF)),
            Route::protected("task", "/tasks/:id", RouteRequirement::any()),
            Route::protected("task_edit", "/tasks/:id/edit", RouteRequirement::roles(STAFF)),
            Route::protected("projects", "/projects", RouteRequirement::roles(STAFF)),
            Route::protected("chat", "/chat", RouteRequirement::any()),
            Route::protected("notifications", "/notifications", RouteRequirement::any()),
            Route::protected("team", "/team", RouteRequirement::roles(STAFF)),
            Route::protected("profile", "/profile", RouteRequirement::any()),
            Route::protected("settings", "/settings", RouteRequirement::roles(ADMIN_ONLY)),
            // Root
            Route {
                name: "root",
                pattern: "/",
                access: RouteAccess::Landing,
            },
        ])
    }

    /// Resolve `path` to a route.
    ///
    /// Query strings, fragments and trailing slashes are ignored. When
    /// several patterns match, the one with the most literal segments wins,
    /// so `/tasks/new` is not captured by `/tasks/:id`.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = normalize_path(path);
        let segments = split_segments(&path);

        self.routes
            .iter()
            .filter_map(|route| {
                route
                    .matches(&segments)
                    .map(|(params, literal)| (route, params, literal))
            })
            .max_by_key(|(_, _, literal)| *literal)
            .map(|(route, params, _)| RouteMatch {
                route,
                path: path.clone(),
                params,
            })
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.split(&['?', '#'][..]).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

// ============================================================================
// Navigation menu
// ============================================================================

/// Sidebar entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
    pub requirement: RouteRequirement,
}

impl NavItem {
    fn new(label: &'static str, href: &'static str, requirement: RouteRequirement) -> Self {
        Self {
            label,
            href,
            requirement,
        }
    }
}

pub fn nav_items() -> Vec<NavItem> {
    vec![
        NavItem::new("Dashboard", "/dashboard", RouteRequirement::any()),
        NavItem::new("Tasks", "/tasks", RouteRequirement::any()),
        NavItem::new("Projects", "/projects", RouteRequirement::roles(STAFF)),
        NavItem::new("Chat", "/chat", RouteRequirement::any()),
        NavItem::new("Notifications", "/notifications", RouteRequirement::any()),
        NavItem::new("Team", "/team", RouteRequirement::roles(STAFF)),
        NavItem::new("Settings", "/settings", RouteRequirement::roles(ADMIN_ONLY)),
    ]
}

/// Sidebar entries the role may see
pub fn visible_nav_items(role: Role) -> Vec<NavItem> {
    nav_items()
        .into_iter()
        .filter(|item| is_permitted(role, &item.requirement))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_static_routes() {
        let table = RouteTable::taskflow();
        assert_eq!(table.match_path("/dashboard").unwrap().route.name, "dashboard");
        assert_eq!(table.match_path("/login").unwrap().route.name, "login");
        assert_eq!(table.match_path("/").unwrap().route.name, "root");
        assert!(table.match_path("/nowhere").is_none());
        assert!(table.match_path("/tasks/1/comments").is_none());
    }

    #[test]
    fn test_literal_segments_win() {
        let table = RouteTable::taskflow();
        let m = table.match_path("/tasks/new").unwrap();
        assert_eq!(m.route.name, "task_new");
        assert!(m.params.is_empty());

        let m = table.match_path("/tasks/42").unwrap();
        assert_eq!(m.route.name, "task");
        assert_eq!(m.param("id"), Some("42"));

        let m = table.match_path("/tasks/42/edit").unwrap();
        assert_eq!(m.route.name, "task_edit");
        assert_eq!(m.param("id"), Some("42"));
    }

    #[test]
    fn test_path_normalization() {
        let table = RouteTable::taskflow();
        let m = table.match_path("/settings/?tab=general#top").unwrap();
        assert_eq!(m.route.name, "settings");
        assert_eq!(m.path, "/settings");
        assert_eq!(table.match_path("tasks").unwrap().route.name, "tasks");
        assert_eq!(table.match_path("").unwrap().route.name, "root");
    }

    #[test]
    fn test_route_requirements() {
        let table = RouteTable::taskflow();
        assert_eq!(table.match_path("/register").unwrap().route.access, RouteAccess::Public);
        assert_eq!(
            table.match_path("/settings").unwrap().route.access,
            RouteAccess::Protected(RouteRequirement::roles(&[Role::Admin]))
        );
        assert_eq!(
            table.match_path("/profile").unwrap().route.access,
            RouteAccess::Protected(RouteRequirement::any())
        );
    }

    #[test]
    fn test_visible_nav_items() {
        let labels = |role| {
            visible_nav_items(role)
                .into_iter()
                .map(|item| item.label)
                .collect::<Vec<_>>()
        };

        assert_eq!(
            labels(Role::Employee),
            vec!["Dashboard", "Tasks", "Chat", "Notifications"]
        );
        assert_eq!(
            labels(Role::Manager),
            vec!["Dashboard", "Tasks", "Projects", "Chat", "Notifications", "Team"]
        );
        assert_eq!(labels(Role::Admin).len(), nav_items().len());
    }

    #[test]
    fn test_nav_items_agree_with_routes() {
        let table = RouteTable::taskflow();
        for item in nav_items() {
            let route = table.match_path(item.href).unwrap();
            assert_eq!(route.route.access, RouteAccess::Protected(item.requirement.clone()));
        }
    }
}
