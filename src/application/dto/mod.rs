// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are transport-friendly representations
// - DTOs are simple, serializable structs
// - Dates travel as strings; parsing happens here, once

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Batch, BatchOption};
use crate::error::{AppError, AppResult};
use crate::services::{BatchIdentity, CreateBatchRequest};

// ============================================================================
// BATCH DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDto {
    pub id: String,
    pub display_name: String,
    pub start_date: String,
    pub end_date: String,
    pub active: bool,
    pub notes: String,
    /// False for candidates synthesized by the option window
    pub is_persisted: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl BatchDto {
    fn from_batch(batch: Batch, is_persisted: bool) -> Self {
        Self {
            id: batch.id,
            display_name: batch.display_name,
            start_date: batch.start_date.to_rfc3339(),
            end_date: batch.end_date.to_rfc3339(),
            active: batch.active,
            notes: batch.notes,
            is_persisted,
            created_at: batch.created_at.to_rfc3339(),
            updated_at: batch.updated_at.to_rfc3339(),
        }
    }
}

/// Batches read from the store
impl From<Batch> for BatchDto {
    fn from(batch: Batch) -> Self {
        Self::from_batch(batch, true)
    }
}

impl From<BatchOption> for BatchDto {
    fn from(option: BatchOption) -> Self {
        let is_persisted = option.is_persisted();
        Self::from_batch(option.into_batch(), is_persisted)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBatchDto {
    pub batch: BatchDto,
    pub was_created: bool,
}

/// How the caller identifies the batch to resolve.
///
/// Tagged by `kind`, e.g. `{"kind": "by_years", "start_year": 2025}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchIdentityDto {
    ByDates {
        start_date: String,
        end_date: String,
    },
    ByYears {
        start_year: i32,
        #[serde(default)]
        end_year: Option<i32>,
    },
    ById {
        batch_id: String,
    },
    CurrentYear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBatchDto {
    #[serde(flatten)]
    pub identity: BatchIdentityDto,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TryFrom<CreateBatchDto> for CreateBatchRequest {
    type Error = AppError;

    fn try_from(dto: CreateBatchDto) -> AppResult<Self> {
        let identity = match dto.identity {
            BatchIdentityDto::ByDates {
                start_date,
                end_date,
            } => BatchIdentity::ByDates {
                start_date: parse_date_input(&start_date)?,
                end_date: parse_date_input(&end_date)?,
            },
            BatchIdentityDto::ByYears {
                start_year,
                end_year,
            } => BatchIdentity::ByYears {
                start_year,
                end_year,
            },
            BatchIdentityDto::ById { batch_id } => BatchIdentity::ById { id: batch_id },
            BatchIdentityDto::CurrentYear => BatchIdentity::CurrentYear,
        };

        Ok(CreateBatchRequest {
            identity,
            display_name: dto.display_name,
            active: dto.active,
            notes: dto.notes,
        })
    }
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC)
pub fn parse_date_input(raw: &str) -> AppResult<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::InvalidInput(format!("'{}' is not a valid date", raw)))
}
