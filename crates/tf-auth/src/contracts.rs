//! Form contracts for login and registration
//!
//! Data-entry boundary: raw form input is checked here, and roles arrive
//! as strings and leave as [`Role`] values.

use serde::Deserialize;
use tf_core::config::AuthConfig;
use tf_core::error::ValidationErrors;
use tf_models::{Role, NAME_MAX_LENGTH};

/// Login form input
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_email(&self.email, &mut errors);
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        errors.into_result()
    }
}

/// Registration form input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: String,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            role: Role::Employee.as_str().to_string(),
        }
    }
}

/// A registration form that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl RegistrationForm {
    pub fn validate(&self, config: &AuthConfig) -> Result<ValidRegistration, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name_length = self.name.trim().chars().count();
        if name_length < config.name_min_length {
            errors.add(
                "name",
                format!("Name must be at least {} characters", config.name_min_length),
            );
        } else if name_length > NAME_MAX_LENGTH {
            errors.add(
                "name",
                format!("Name must be at most {} characters", NAME_MAX_LENGTH),
            );
        }

        validate_email(&self.email, &mut errors);

        if self.password.chars().count() < config.password_min_length {
            errors.add(
                "password",
                format!("Password must be at least {} characters", config.password_min_length),
            );
        }
        if self.password != self.confirm_password {
            errors.add("confirmPassword", "Passwords don't match");
        }

        let role = self.role.parse::<Role>();
        if let Err(ref e) = role {
            errors.add("role", e.to_string());
        }

        match role {
            Ok(role) if errors.is_empty() => Ok(ValidRegistration {
                name: self.name.trim().to_string(),
                email: self.email.clone(),
                password: self.password.clone(),
                role,
            }),
            _ => Err(errors),
        }
    }
}

fn validate_email(email: &str, errors: &mut ValidationErrors) {
    if !validator::validate_email(email) {
        errors.add("email", "Please enter a valid email address");
    }
}
