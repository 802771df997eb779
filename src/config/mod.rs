//! Configuration module for sitehits
//!
//! This module defines the application settings and the displayed field layout.

pub mod app_config;
mod field_spec;
pub mod path_resolver;

pub use app_config::AppConfig;
pub use field_spec::{FieldEntry, FieldSpec};
