//! # tf-core
//!
//! Core types shared by the TaskFlow crates.
//!
//! - Field-keyed validation errors
//! - Application configuration and its environment overlay

pub mod config;
pub mod error;

pub use config::{AppConfig, AuthConfig, ConfigError, RoutesConfig, SessionBackend, SessionConfig};
pub use error::ValidationErrors;
