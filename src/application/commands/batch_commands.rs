// src/application/commands/batch_commands.rs

use chrono::{Datelike, NaiveDate, Utc};
use log::debug;

use crate::application::{dto::*, error_handling::ErrorResponse, state::AppState};
use crate::services::CreateBatchRequest;

/// Every stored batch
pub fn list_all(state: &AppState) -> Result<Vec<BatchDto>, ErrorResponse> {
    let batches = state.batch_service.list_all()?;
    Ok(batches.into_iter().map(BatchDto::from).collect())
}

/// Option window around `current_year` (default: this year)
pub fn list_options(
    state: &AppState,
    current_year: Option<i32>,
    count: Option<usize>,
) -> Result<Vec<BatchDto>, ErrorResponse> {
    list_options_at(state, current_year, count, Utc::now().date_naive())
}

pub fn list_options_at(
    state: &AppState,
    current_year: Option<i32>,
    count: Option<usize>,
    today: NaiveDate,
) -> Result<Vec<BatchDto>, ErrorResponse> {
    let current_year = current_year.unwrap_or_else(|| today.year());
    let count = count.unwrap_or(state.batch_service.rules().default_option_count);

    let options = state
        .batch_service
        .generate_options(current_year, count, today)?;

    Ok(options.into_iter().map(BatchDto::from).collect())
}

/// Stored batch for the descriptor, created first if absent
pub fn resolve_or_create(
    state: &AppState,
    request: CreateBatchDto,
) -> Result<ResolvedBatchDto, ErrorResponse> {
    resolve_or_create_at(state, request, Utc::now().date_naive())
}

pub fn resolve_or_create_at(
    state: &AppState,
    request: CreateBatchDto,
    today: NaiveDate,
) -> Result<ResolvedBatchDto, ErrorResponse> {
    let request = CreateBatchRequest::try_from(request)?;
    let (batch, was_created) = state.batch_service.create_or_fetch(request, today)?;

    debug!("Resolved batch {} (created: {})", batch.id, was_created);

    Ok(ResolvedBatchDto {
        batch: BatchDto::from(batch),
        was_created,
    })
}

/// Lookup by id; `None` when no such batch is stored
pub fn get_one(state: &AppState, id: String) -> Result<Option<BatchDto>, ErrorResponse> {
    if id.trim().is_empty() {
        return Err(ErrorResponse::validation("Batch id cannot be empty".to_string()));
    }

    let batch = state.batch_service.get_by_id(&id)?;
    Ok(batch.map(BatchDto::from))
}
