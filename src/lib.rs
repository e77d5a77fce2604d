// src/lib.rs
// SchoolHub - Academic batch identity resolver
//
// Architecture:
// - Domain-centric: identity arithmetic and labels live in the batch domain
// - Event-driven: creations are announced on the event bus
// - Explicit: the reference date is always passed in, never read implicitly
// - Application Layer: transport boundary (DTOs, commands, error mapping)

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod logging;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::batch::{
    bare_label, compute_id, display_label, end_date_for_year, id_from_dates, start_date_for_year,
    year_range_from_id,
};
pub use domain::{validate_batch, Batch, BatchIdForm, BatchOption, DomainError, DomainResult};

// ============================================================================
// PUBLIC API - Configuration & Errors
// ============================================================================

pub use config::{load_rules, BatchRules};
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{BatchCreated, BatchCreationConflicted, DomainEvent, EventBus, EventLogEntry};

// ============================================================================
// PUBLIC API - Persistence
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};
pub use repositories::{BatchRepository, SqliteBatchRepository};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{BatchIdentity, BatchService, CreateBatchRequest};

// ============================================================================
// PUBLIC API - Application
// ============================================================================

pub use application::{AppState, ErrorResponse, ErrorType};
