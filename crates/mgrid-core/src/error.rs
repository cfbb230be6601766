//! Error types shared by the graph, grid and conversion layers.
//!
//! Every fallible operation in the workspace returns [`GridResult`]. The four
//! variants follow how a failure should be handled by the caller:
//!
//! - [`GridError::Lookup`]: the caller named something that is not there.
//! - [`GridError::Conflict`]: a mutation would break a structural invariant.
//! - [`GridError::Configuration`]: a value needed at conversion time cannot
//!   be resolved (missing voltage level, unknown standard type).
//! - [`GridError::Validation`]: explicit inputs contradict each other.
//!
//! # Example
//!
//! ```
//! use mgrid_core::{GridError, GridResult};
//!
//! fn lookup(name: &str) -> GridResult<usize> {
//!     Err(GridError::lookup(format!("node '{name}' does not exist")))
//! }
//!
//! assert!(matches!(lookup("n1"), Err(GridError::Lookup(_))));
//! ```

use thiserror::Error;

/// Unified error type for multilayer grid operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// A node, layer or edge is not present in the structure
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// A structural invariant would be violated
    #[error("Conflict error: {0}")]
    Conflict(String),

    /// A value required at conversion time cannot be resolved
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Explicit inputs contradict each other
    #[error("Validation error: {0}")]
    Validation(String),
}

impl GridError {
    pub fn lookup(msg: impl Into<String>) -> Self {
        GridError::Lookup(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        GridError::Conflict(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        GridError::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        GridError::Validation(msg.into())
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            GridError::Lookup(_) => "lookup",
            GridError::Conflict(_) => "conflict",
            GridError::Configuration(_) => "configuration",
            GridError::Validation(_) => "validation",
        }
    }
}

/// Convenience type alias for Results using GridError.
pub type GridResult<T> = Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridError::conflict("node 'n1' already carries a conversion");
        assert!(err.to_string().contains("Conflict error"));
        assert!(err.to_string().contains("n1"));
        assert_eq!(err.kind(), "conflict");
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> GridResult<()> {
            Err(GridError::validation("q mismatch"))
        }

        fn outer() -> GridResult<()> {
            inner()?;
            Ok(())
        }

        assert!(matches!(outer(), Err(GridError::Validation(_))));
    }
}
