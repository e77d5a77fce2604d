use super::entity::Batch;
use super::identity::id_from_dates;
use crate::config::BatchRules;
use crate::domain::{DomainError, DomainResult};

/// Validates all Batch invariants that must hold before a batch is stored.
/// Candidates that are only described (never stored) skip this.
pub fn validate_batch(rules: &BatchRules, batch: &Batch) -> DomainResult<()> {
    validate_display_name(&batch.display_name)?;
    validate_dates(batch)?;
    validate_id(rules, batch)?;
    Ok(())
}

fn validate_display_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Batch display name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_dates(batch: &Batch) -> DomainResult<()> {
    if batch.start_date >= batch.end_date {
        return Err(DomainError::InvariantViolation(format!(
            "Start date {} must be before end date {}",
            batch.start_date.to_rfc3339(),
            batch.end_date.to_rfc3339()
        )));
    }
    Ok(())
}

/// Id must be the one derived from the intake year, and not pre-epoch
fn validate_id(rules: &BatchRules, batch: &Batch) -> DomainResult<()> {
    let expected = id_from_dates(rules, &batch.start_date, &batch.end_date);
    if batch.id != expected {
        return Err(DomainError::InvariantViolation(format!(
            "Batch id '{}' does not match intake year {} (expected '{}')",
            batch.id,
            batch.start_year(),
            expected
        )));
    }

    let index: i64 = batch.id.parse().map_err(|_| {
        DomainError::InvariantViolation(format!("Batch id '{}' is not numeric", batch.id))
    })?;
    if index < 1 {
        return Err(DomainError::InvariantViolation(format!(
            "Intake year {} is before the {} epoch; batch ids start at 1",
            batch.start_year(),
            rules.base_start_year
        )));
    }
    Ok(())
}

/// Invariants that must hold true for the Batch domain:
///
/// 1. Id is the decimal sequence index of the intake year
/// 2. At most one stored batch per id
/// 3. Stored ids are >= 1
/// 4. Start date is strictly before end date
/// 5. Display name cannot be empty
/// 6. A stored batch is never rewritten by creation
