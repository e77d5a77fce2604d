// Batch identity arithmetic.
//
// The id of a batch is an affine function of its intake year:
//   id = start_year - base_start_year + 1
// so the cohort entering in the epoch year is "1". The end year never
// participates; it is accepted only to mirror the inverse operation.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::config::BatchRules;
use crate::domain::{DomainError, DomainResult};

/// Numeric sequence index for an intake year. Zero and negative values
/// are returned as-is for pre-epoch years.
pub fn sequence_index(rules: &BatchRules, start_year: i32) -> i64 {
    i64::from(start_year) - i64::from(rules.base_start_year) + 1
}

/// Canonical id for a year range
pub fn compute_id(rules: &BatchRules, start_year: i32, _end_year: i32) -> String {
    sequence_index(rules, start_year).to_string()
}

/// Inverse of `compute_id`: (intake year, graduation year) for an id
pub fn year_range_from_id(rules: &BatchRules, id: &str) -> DomainResult<(i32, i32)> {
    let index: i64 = id
        .trim()
        .parse()
        .map_err(|_| DomainError::InvalidInput(format!("Batch id '{}' is not an integer", id)))?;

    year_range_from_index(rules, index)
}

fn year_range_from_index(rules: &BatchRules, index: i64) -> DomainResult<(i32, i32)> {
    let out_of_range = || DomainError::InvalidInput(format!("Batch id {} is out of range", index));
    let start_year = index
        .checked_sub(1)
        .and_then(|offset| i64::from(rules.base_start_year).checked_add(offset))
        .ok_or_else(out_of_range)?;
    let start_year = i32::try_from(start_year).map_err(|_| out_of_range())?;
    let end_year = graduation_year(rules, start_year)?;

    Ok((start_year, end_year))
}

/// Graduation year for an intake year
pub fn graduation_year(rules: &BatchRules, start_year: i32) -> DomainResult<i32> {
    start_year
        .checked_add(rules.program_length_years)
        .ok_or_else(|| {
            DomainError::InvalidInput(format!("Intake year {} is out of range", start_year))
        })
}

/// Canonical id for a batch described by its dates
pub fn id_from_dates(rules: &BatchRules, start_date: &DateTime<Utc>, end_date: &DateTime<Utc>) -> String {
    compute_id(rules, start_date.year(), end_date.year())
}

/// First day of the program for an intake year
pub fn start_date_for_year(rules: &BatchRules, year: i32) -> DomainResult<DateTime<Utc>> {
    midnight_utc(year, rules.start_month, rules.start_day)
}

/// Last day of the program for a graduation year
pub fn end_date_for_year(rules: &BatchRules, year: i32) -> DomainResult<DateTime<Utc>> {
    midnight_utc(year, rules.end_month, rules.end_day)
}

fn midnight_utc(year: i32, month: u32, day: u32) -> DomainResult<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            DomainError::InvalidInput(format!(
                "{:04}-{:02}-{:02} is not a representable date",
                year, month, day
            ))
        })
}

/// How a caller-supplied id string reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchIdForm {
    /// Canonical numeric id, e.g. "4"
    Sequence(i64),

    /// Legacy "2025-2028" form: literal intake and graduation years
    YearRange { start_year: i32, end_year: i32 },
}

/// Read an id string in either the canonical or the legacy year-range form
pub fn parse_batch_id(raw: &str) -> DomainResult<BatchIdForm> {
    let trimmed = raw.trim();

    if let Ok(index) = trimmed.parse::<i64>() {
        return Ok(BatchIdForm::Sequence(index));
    }

    if let Some((start, end)) = trimmed.split_once('-') {
        if let (Ok(start_year), Ok(end_year)) = (start.trim().parse(), end.trim().parse()) {
            return Ok(BatchIdForm::YearRange {
                start_year,
                end_year,
            });
        }
    }

    Err(DomainError::InvalidInput(format!(
        "Batch id '{}' is neither a number nor a YYYY-YYYY range",
        raw
    )))
}

impl BatchIdForm {
    /// (intake year, graduation year) this id refers to
    pub fn year_range(&self, rules: &BatchRules) -> DomainResult<(i32, i32)> {
        match *self {
            BatchIdForm::Sequence(index) => year_range_from_index(rules, index),
            BatchIdForm::YearRange {
                start_year,
                end_year,
            } => Ok((start_year, end_year)),
        }
    }
}
