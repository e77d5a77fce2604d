// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - Explicit SQL only

pub mod batch_repository;

pub use batch_repository::{BatchRepository, SqliteBatchRepository};

#[cfg(test)]
pub use batch_repository::MockBatchRepository;
