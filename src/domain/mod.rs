// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod batch;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use batch::{validate_batch, Batch, BatchIdForm, BatchOption};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Identity data the caller supplied cannot describe a batch
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
