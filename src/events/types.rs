// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// BATCH DOMAIN EVENTS
// ============================================================================

/// Emitted when a candidate batch is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub batch_id: String,
    pub display_name: String,
    pub start_year: i32,
    pub end_year: i32,
}

impl BatchCreated {
    pub fn new(batch_id: String, display_name: String, start_year: i32, end_year: i32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            batch_id,
            display_name,
            start_year,
            end_year,
        }
    }
}

impl DomainEvent for BatchCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "BatchCreated" }
}

/// Emitted when a create lost the insert race and the stored batch was
/// returned instead
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCreationConflicted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub batch_id: String,
}

impl BatchCreationConflicted {
    pub fn new(batch_id: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            batch_id,
        }
    }
}

impl DomainEvent for BatchCreationConflicted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "BatchCreationConflicted" }
}
