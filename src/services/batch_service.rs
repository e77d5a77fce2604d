// src/services/batch_service.rs
//
// Batch Service - cohort identity resolution
//
// Maps intake years to stable batch ids, describes a rolling window of
// batches (stored or synthesized) and creates batches idempotently.
//
// CRITICAL RULES:
// - The reference date is always a parameter; this service never reads the clock
// - Stored batches are returned exactly as stored, never re-synthesized
// - Creation never updates an existing batch
// - Every store failure is propagated; nothing is logged-and-swallowed
// - Read, decide, write once: no lock spans the existence check and the insert

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::BatchRules;
use crate::domain::batch::{
    bare_label, compute_id, display_label, end_date_for_year, graduation_year, id_from_dates,
    parse_batch_id, start_date_for_year, validate_batch, Batch, BatchOption,
};
use crate::error::{AppError, AppResult};
use crate::events::{BatchCreated, BatchCreationConflicted, EventBus};
use crate::repositories::BatchRepository;

/// Which batch a create request refers to. Exactly one form per request.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchIdentity {
    /// Explicit program dates
    ByDates {
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    },

    /// Intake year, and graduation year if it differs from the program length
    ByYears {
        start_year: i32,
        end_year: Option<i32>,
    },

    /// Canonical id ("5") or legacy year range ("2025-2028")
    ById { id: String },

    /// The batch whose intake is this calendar year
    CurrentYear,
}

#[derive(Debug, Clone)]
pub struct CreateBatchRequest {
    pub identity: BatchIdentity,
    pub display_name: Option<String>,
    pub active: Option<bool>,
    pub notes: Option<String>,
}

impl CreateBatchRequest {
    pub fn new(identity: BatchIdentity) -> Self {
        Self {
            identity,
            display_name: None,
            active: None,
            notes: None,
        }
    }
}

/// Identity after defaults are applied: the id to look up and the dates
/// a new batch would get
#[derive(Debug, Clone, PartialEq)]
struct ResolvedIdentity {
    id: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

// Larger windows grow on demand; a calendar year past chrono's range ends them
const MAX_PREALLOCATED_OPTIONS: usize = 64;

pub struct BatchService {
    batch_repo: Arc<dyn BatchRepository>,
    event_bus: Arc<EventBus>,
    rules: BatchRules,
}

impl BatchService {
    pub fn new(batch_repo: Arc<dyn BatchRepository>, event_bus: Arc<EventBus>, rules: BatchRules) -> Self {
        Self {
            batch_repo,
            event_bus,
            rules,
        }
    }

    pub fn rules(&self) -> &BatchRules {
        &self.rules
    }

    /// Every stored batch, by start date
    pub fn list_all(&self) -> AppResult<Vec<Batch>> {
        self.batch_repo.find_all()
    }

    /// Direct lookup. `None` is the normal not-found outcome.
    pub fn get_by_id(&self, id: &str) -> AppResult<Option<Batch>> {
        self.batch_repo.find_one(id.trim())
    }

    /// Describe `count` consecutive batches starting `window_lookback_years`
    /// before `current_year`, in ascending intake order.
    ///
    /// Stored batches are returned as `Persisted`; the gaps are filled with
    /// `Candidate`s whose labels carry the grade they are in on `today`.
    pub fn generate_options(
        &self,
        current_year: i32,
        count: usize,
        today: NaiveDate,
    ) -> AppResult<Vec<BatchOption>> {
        let mut stored: HashMap<String, Batch> = self
            .batch_repo
            .find_all()?
            .into_iter()
            .map(|batch| (batch.id.clone(), batch))
            .collect();

        let window_len = i32::try_from(count)
            .map_err(|_| AppError::InvalidInput(format!("Option count {} is too large", count)))?;
        let first_start_year = current_year
            .checked_sub(self.rules.window_lookback_years)
            .ok_or_else(|| {
                AppError::InvalidInput(format!("Option window before year {} underflows", current_year))
            })?;
        let mut options = Vec::with_capacity(count.min(MAX_PREALLOCATED_OPTIONS));

        for offset in 0..window_len {
            let start_year = first_start_year.checked_add(offset).ok_or_else(|| {
                AppError::InvalidInput(format!("Option window past year {} overflows", first_start_year))
            })?;
            let end_year = graduation_year(&self.rules, start_year)?;
            let id = compute_id(&self.rules, start_year, end_year);

            let option = match stored.remove(&id) {
                Some(batch) => BatchOption::Persisted(batch),
                None => BatchOption::Candidate(self.synthesize_candidate(id, start_year, end_year, today)?),
            };
            options.push(option);
        }

        debug!(
            "Generated {} batch options from intake year {} ({} stored)",
            options.len(),
            first_start_year,
            options.iter().filter(|o| o.is_persisted()).count()
        );

        Ok(options)
    }

    /// Return the stored batch for this identity, or store a new one.
    ///
    /// `was_created` is true only when this call inserted. A concurrent
    /// insert of the same id between the lookup and the insert surfaces as
    /// `AppError::DuplicateKey`; see `create_or_fetch`.
    pub fn create_if_absent(
        &self,
        request: CreateBatchRequest,
        today: NaiveDate,
    ) -> AppResult<(Batch, bool)> {
        let identity = self.resolve_identity(&request.identity, today)?;

        if let Some(existing) = self.batch_repo.find_one(&identity.id)? {
            debug!("Batch {} already exists, returning stored record", existing.id);
            return Ok((existing, false));
        }

        let display_name = request
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| {
                bare_label(&self.rules, identity.start_date.year(), identity.end_date.year())
            });

        let mut batch = Batch::new(identity.id, display_name, identity.start_date, identity.end_date);
        batch.active = request.active.unwrap_or(true);
        batch.notes = request.notes.unwrap_or_default();

        validate_batch(&self.rules, &batch)?;
        let persisted = self.batch_repo.insert(&batch)?;

        info!("Created batch {} ({})", persisted.id, persisted.display_name);
        self.event_bus.emit(BatchCreated::new(
            persisted.id.clone(),
            persisted.display_name.clone(),
            persisted.start_year(),
            persisted.end_year(),
        ));

        Ok((persisted, true))
    }

    /// `create_if_absent`, but a lost insert race is answered by fetching
    /// the winner's record once instead of failing.
    pub fn create_or_fetch(
        &self,
        request: CreateBatchRequest,
        today: NaiveDate,
    ) -> AppResult<(Batch, bool)> {
        match self.create_if_absent(request, today) {
            Err(AppError::DuplicateKey(id)) => {
                warn!("Batch {} was created concurrently, fetching stored record", id);
                let existing = self.batch_repo.find_one(&id)?.ok_or(AppError::NotFound)?;
                self.event_bus.emit(BatchCreationConflicted::new(id));
                Ok((existing, false))
            }
            other => other,
        }
    }

    fn synthesize_candidate(
        &self,
        id: String,
        start_year: i32,
        end_year: i32,
        today: NaiveDate,
    ) -> AppResult<Batch> {
        Ok(Batch::new(
            id,
            display_label(&self.rules, start_year, end_year, today),
            start_date_for_year(&self.rules, start_year)?,
            end_date_for_year(&self.rules, end_year)?,
        ))
    }

    fn resolve_identity(&self, identity: &BatchIdentity, today: NaiveDate) -> AppResult<ResolvedIdentity> {
        match identity {
            BatchIdentity::ByDates {
                start_date,
                end_date,
            } => Ok(ResolvedIdentity {
                id: id_from_dates(&self.rules, start_date, end_date),
                start_date: *start_date,
                end_date: *end_date,
            }),

            BatchIdentity::ByYears {
                start_year,
                end_year,
            } => {
                let end_year = match end_year {
                    Some(year) => *year,
                    None => graduation_year(&self.rules, *start_year)?,
                };
                self.identity_for_years(*start_year, end_year)
            }

            BatchIdentity::ById { id } => {
                // A numeric id maps back to its own years, so "04" and "4"
                // both resolve to "4"
                let (start_year, end_year) = parse_batch_id(id)?.year_range(&self.rules)?;
                self.identity_for_years(start_year, end_year)
            }

            BatchIdentity::CurrentYear => {
                let start_year = today.year();
                self.identity_for_years(start_year, graduation_year(&self.rules, start_year)?)
            }
        }
    }

    fn identity_for_years(&self, start_year: i32, end_year: i32) -> AppResult<ResolvedIdentity> {
        Ok(ResolvedIdentity {
            id: compute_id(&self.rules, start_year, end_year),
            start_date: start_date_for_year(&self.rules, start_year)?,
            end_date: end_date_for_year(&self.rules, end_year)?,
        })
    }
}
