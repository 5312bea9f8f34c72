//! Error types for sqlweave.

use thiserror::Error;

/// Result type alias for compile operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors reported by [`compile()`](crate::QueryBuilder::compile).
///
/// The fluent surface itself never fails; problems detected mid-chain
/// (such as an invalid ORDER BY direction) are deferred on the builder
/// and surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Compiling without a target table.
    #[error("no FROM source: set a table before compiling")]
    EmptyFromSource,

    /// INSERT compiled with no column assignments.
    #[error("INSERT has no values: call set() before compiling")]
    EmptyInsertPayload,

    /// UPDATE compiled with no column assignments.
    #[error("UPDATE has no SET clause: call set() before compiling")]
    EmptySetClause,

    /// UPDATE or DELETE compiled without a WHERE clause and without
    /// an explicit [`allow_unsafe()`](crate::QueryBuilder::allow_unsafe) opt-in.
    #[error("{0} without WHERE: call allow_unsafe() to compile anyway")]
    UnguardedMutation(&'static str),

    /// ORDER BY direction other than ASC, DESC or RANDOM.
    #[error("invalid ORDER BY direction {0:?} (expected ASC, DESC or RANDOM)")]
    InvalidDirection(String),

    /// Rendered placeholder count does not match the parameter list.
    /// A violation is a renderer defect, never recoverable.
    #[error("placeholder/parameter mismatch: {placeholders} placeholders, {params} parameters")]
    MismatchedParameterCount { placeholders: usize, params: usize },
}
