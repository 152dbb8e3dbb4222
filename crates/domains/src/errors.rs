//! # AppError
//!
//! Centralized error handling for the kanban board.
//! Storage adapters report [`StorageError`]; services translate those into
//! [`AppError`], which inbound adapters map to transport-level outcomes.

use std::fmt;

use thiserror::Error;

use crate::validation::Violations;

/// Failure reported by a repository port.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other integrity constraint (foreign key, not null, check).
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// The store could not be reached (pool exhausted, connection lost).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Query-level failure that fits no other bucket.
    #[error("query failed: {0}")]
    Query(String),

    /// A composite operation failed between begin and commit and was rolled back.
    #[error("transaction '{operation}' aborted: {source}")]
    Aborted {
        operation: &'static str,
        #[source]
        source: Box<StorageError>,
    },
}

impl StorageError {
    pub fn aborted(operation: &'static str, source: StorageError) -> Self {
        Self::Aborted {
            operation,
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through any number of aborts.
    pub fn root(&self) -> &StorageError {
        match self {
            Self::Aborted { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self.root(), Self::Unavailable(_))
    }
}

/// Whether a failed operation was reading or writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// The primary error type for all service operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// The payload broke one or more field rules; storage was never touched.
    #[error("validation failed: {0}")]
    ValidationFailed(Violations),

    /// A referenced entity does not exist.
    #[error("{entity} not found with ID {id}")]
    NotFound { entity: &'static str, id: String },

    /// The write would duplicate a unique association.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Driver or query failure outside a transaction.
    #[error("storage failure during {access}: {source}")]
    StorageFailure {
        access: Access,
        #[source]
        source: StorageError,
    },

    /// A composite write failed and every statement in it was rolled back.
    #[error("transaction aborted: {source}")]
    TransactionAborted {
        #[source]
        source: StorageError,
    },
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Classify a port failure for an operation of the given access kind.
    pub fn from_storage(access: Access, err: StorageError) -> Self {
        if let StorageError::Conflict(message) = err.root() {
            return Self::Conflict(message.clone());
        }
        match err {
            StorageError::Aborted { .. } => Self::TransactionAborted { source: err },
            _ => Self::StorageFailure { access, source: err },
        }
    }
}

/// A specialized Result type for kanban service logic.
pub type Result<T> = std::result::Result<T, AppError>;
