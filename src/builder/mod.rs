//! Builder API for ergonomic filter construction.
//!
//! This module provides a fluent builder, serializable settings and a macro
//! for declaring action spaces with minimal boilerplate.

pub mod error;
pub mod filter;
pub mod macros;
pub mod settings;

pub use error::BuildError;
pub use filter::SafetyFilterBuilder;
pub use settings::FilterSettings;
