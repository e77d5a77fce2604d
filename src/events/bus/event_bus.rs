// src/events/bus/event_bus.rs
//
// Synchronous, in-process event bus.
//
// - Handlers run on the emitting thread, in subscription order
// - Every emission is recorded in the event log
// - A panicking handler does not stop the others

use log::{debug, error};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::events::types::DomainEvent;

type EventHandler = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// One recorded emission
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub occurred_at: String,
    pub handler_count: usize,
}

/// Services emit here; subscribers react without the emitter knowing them.
/// Share it behind an `Arc`.
#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<HashMap<TypeId, Vec<EventHandler>>>,
    event_log: RwLock<Vec<EventLogEntry>>,
}

// Handler panics are caught in `emit`, so a poisoned lock still holds
// consistent data.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every future `E`.
    ///
    /// ```ignore
    /// bus.subscribe::<BatchCreated, _>(|event| {
    ///     log::info!("new batch {}", event.batch_id);
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let erased: EventHandler = Box::new(move |event: &dyn Any| {
            match event.downcast_ref::<E>() {
                Some(event) => handler(event),
                None => error!("Event handler for {} got a foreign event", std::any::type_name::<E>()),
            }
        });

        write(&self.handlers)
            .entry(TypeId::of::<E>())
            .or_default()
            .push(erased);
    }

    /// Record `event`, then run its handlers before returning
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        let handlers = read(&self.handlers);
        let subscribed = handlers.get(&TypeId::of::<E>()).map(Vec::as_slice).unwrap_or(&[]);

        debug!(
            "[EVENT] {} (id: {}) | {} handlers",
            event.event_type(),
            event.event_id(),
            subscribed.len()
        );
        write(&self.event_log).push(EventLogEntry {
            event_type: event.event_type().to_string(),
            event_id: event.event_id().to_string(),
            occurred_at: event.occurred_at().to_rfc3339(),
            handler_count: subscribed.len(),
        });

        for (idx, handler) in subscribed.iter().enumerate() {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| handler(&event as &dyn Any))) {
                error!("Handler {} for {} panicked: {:?}", idx, event.event_type(), payload);
            }
        }
    }

    /// Snapshot of every emission so far
    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        read(&self.event_log).clone()
    }
}
