// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between the transport layer and services
// - Commands accept DTOs, return DTOs
// - Commands handle error conversion for callers
// - Commands NEVER contain business logic

pub mod batch_commands;

pub use batch_commands::*;
