//! Validation error collection
//!
//! Form contracts and model validation report their rejections through
//! [`ValidationErrors`], keyed by the offending field.

use std::collections::HashMap;
use thiserror::Error;

/// Validation errors collection
#[derive(Error, Debug, Default, Clone, PartialEq, Eq)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: HashMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    /// `Ok(())` when nothing was collected, otherwise `Err(self)`
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(source: validator::ValidationErrors) -> Self {
        let mut errors = ValidationErrors::new();
        for (field, field_errors) in source.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("is invalid ({})", error.code));
                errors.add(field, message);
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_field_errors() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add("email", "is not a valid email address");
        errors.add("email", "is too long");

        assert!(!errors.is_empty());
        assert!(errors.has_error("email"));
        assert!(!errors.has_error("name"));
        assert_eq!(errors.get("email").map(Vec::len), Some(2));
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add("role", "is not included in the list");
        let err = errors.into_result().unwrap_err();
        assert!(err.has_error("role"));
    }

    #[test]
    fn test_from_validator_errors() {
        let mut source = validator::ValidationErrors::new();
        let mut blank = validator::ValidationError::new("length");
        blank.message = Some("can't be blank".into());
        source.add("name", blank);
        source.add("email", validator::ValidationError::new("email"));

        let errors = ValidationErrors::from(source);
        assert_eq!(errors.get("name"), Some(&vec!["can't be blank".to_string()]));
        assert_eq!(
            errors.get("email"),
            Some(&vec!["is invalid (email)".to_string()])
        );
    }
}
