// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod batch_service;

#[cfg(test)]
mod batch_service_tests;

pub use batch_service::{BatchIdentity, BatchService, CreateBatchRequest};
