// Batch labels and grade-level annotation.

use chrono::{Datelike, NaiveDate};

use crate::config::BatchRules;

/// Calendar year a school year is named by.
///
/// A school year spans two calendar years and is named by the one it
/// starts in, so dates before the rollover month belong to the
/// previous year's school year.
pub fn school_year_base(rules: &BatchRules, today: NaiveDate) -> i32 {
    if today.month() < rules.school_year_rollover_month {
        today.year() - 1
    } else {
        today.year()
    }
}

/// Grade an intake year's cohort is in on `today`. May fall outside the
/// program's grade span for cohorts that have not started or have graduated.
pub fn current_grade_level(rules: &BatchRules, start_year: i32, today: NaiveDate) -> i32 {
    let years_from_start = school_year_base(rules, today) - start_year;
    rules.first_grade_level + years_from_start
}

/// "Batch 2023-2026"
pub fn bare_label(rules: &BatchRules, start_year: i32, end_year: i32) -> String {
    format!("{} {}-{}", rules.batch_word, start_year, end_year)
}

/// Bare label, plus "(Grade N)" when the cohort is currently enrolled
pub fn display_label(rules: &BatchRules, start_year: i32, end_year: i32, today: NaiveDate) -> String {
    let label = bare_label(rules, start_year, end_year);
    let grade = current_grade_level(rules, start_year, today);

    if (rules.first_grade_level..=rules.last_grade_level()).contains(&grade) {
        format!("{} ({} {})", label, rules.grade_word, grade)
    } else {
        label
    }
}
