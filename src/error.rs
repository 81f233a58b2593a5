//! Error types for the wage engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for the fatal conditions that abort a person-month computation.
//! Recoverable per-report conditions are reported as
//! [`ComputationWarning`](crate::models::ComputationWarning) values instead.

use thiserror::Error;

/// The main error type for the wage engine.
///
/// All fatal conditions abort the computation for the requested
/// person-month; partial results are discarded.
///
/// # Example
///
/// ```
/// use wage_engine::error::EngineError;
///
/// let error = EngineError::PersonNotFound { person_id: 42 };
/// assert_eq!(error.to_string(), "person not found: 42");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested person does not exist.
    #[error("person not found: {person_id}")]
    PersonNotFound {
        /// The person id that was requested.
        person_id: i64,
    },

    /// A referenced shift kind, apartment, or other reference row is absent.
    ///
    /// Also raised when two history rows share the same
    /// `(entity, year, month)` key, which the schema's `UNIQUE` constraint
    /// is supposed to rule out.
    #[error("reference data missing: {entity} {id}")]
    ReferenceDataMissing {
        /// The kind of entity that was looked up (e.g. "shift_type").
        entity: &'static str,
        /// The id that failed to resolve.
        id: i64,
    },

    /// The underlying relational store returned an error.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// A type alias for Results that return [`EngineError`].
pub type EngineResult<T> = Result<T, EngineError>;
