// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Boundary between the transport layer (HTTP handlers, UI) and services
// - Translates between DTOs and domain entities
// - The only place that reads the wall clock

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod state;

pub use commands::*;
pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType};
pub use state::AppState;
