//! Core error type.
//!
//! Both variants are per-request failures: a bad duration or an off-pool
//! resource pick skips that one dispatch and never halts the simulation.
//! The driver crate wraps this type as one variant of its own error enum.

use thiserror::Error;

use crate::{ResourceId, UserId};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QsimError {
    /// A requested duration of 0 ticks.  Rejected rather than clamped so a
    /// faulty duration generator surfaces at the dispatch site.
    #[error("user {user} requested an invalid duration of {requested} ticks")]
    InvalidDuration { user: UserId, requested: u64 },

    /// A selection strategy returned a resource the driver does not own.
    #[error("resource {0} is not in the pool")]
    UnknownResource(ResourceId),
}

/// Shorthand result type for qsim crates.
pub type QsimResult<T> = Result<T, QsimError>;
