// src/events/mod.rs
//
// Internal Event System - Public API

pub mod bus;
pub mod types;

pub use types::{BatchCreated, BatchCreationConflicted, DomainEvent};

pub use bus::{EventBus, EventLogEntry};
