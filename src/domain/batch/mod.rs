//! Critical Batch Invariants:
//!
//! 1. Batch identity is derived from the intake year, never chosen freely
//! 2. Candidates are descriptions only; they reach the store through creation
//! 3. Creation never modifies an existing batch
//! 4. Calendar constants come from `BatchRules`, not literals

pub mod entity;
pub mod identity;
pub mod invariants;
pub mod naming;

pub use entity::{Batch, BatchOption};
pub use identity::{
    compute_id, end_date_for_year, graduation_year, id_from_dates, parse_batch_id,
    start_date_for_year, year_range_from_id, BatchIdForm,
};
pub use invariants::validate_batch;
pub use naming::{bare_label, current_grade_level, display_label, school_year_base};
