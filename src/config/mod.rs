// src/config/mod.rs
//
// Batch rules configuration
//
// PRINCIPLES:
// - Every calendar/epoch constant the resolver depends on lives here
// - Missing config file means defaults, a broken one is an error
// - Rules are validated once at load time

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Directory name under the platform data dir
pub const APP_DIR_NAME: &str = "schoolhub";

/// Config file name inside the app data directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Domain constants for cohort ("batch") identity and naming.
///
/// Institutions with a different epoch, program length or calendar
/// can override any field; omitted fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchRules {
    /// Intake year of the cohort whose id is "1"
    pub base_start_year: i32,

    /// Years between intake and graduation
    pub program_length_years: i32,

    /// Grade a cohort is in during its intake year
    pub first_grade_level: i32,

    /// Program start (month, day), UTC
    pub start_month: u32,
    pub start_day: u32,

    /// Program end (month, day), UTC
    pub end_month: u32,
    pub end_day: u32,

    /// First month that belongs to the new school year.
    /// Months before it are named by the previous calendar year.
    pub school_year_rollover_month: u32,

    /// How many intake years before the current year the option window starts
    pub window_lookback_years: i32,

    /// Window size when the caller does not ask for one
    pub default_option_count: usize,

    /// Leading word of every batch label ("Batch 2023-2026")
    pub batch_word: String,

    /// Word used in the grade annotation ("(Grade 11)")
    pub grade_word: String,
}

impl Default for BatchRules {
    fn default() -> Self {
        Self {
            base_start_year: 2021,
            program_length_years: 3,
            first_grade_level: 10,
            start_month: 9,
            start_day: 1,
            end_month: 6,
            end_day: 30,
            school_year_rollover_month: 7,
            window_lookback_years: 2,
            default_option_count: 5,
            batch_word: "Batch".to_string(),
            grade_word: "Grade".to_string(),
        }
    }
}

impl BatchRules {
    /// Highest grade a cohort reaches before graduating
    pub fn last_grade_level(&self) -> i32 {
        self.first_grade_level + self.program_length_years - 1
    }

    /// Check the rules are usable for every representable year
    pub fn validate(&self) -> AppResult<()> {
        if self.program_length_years < 1 {
            return Err(AppError::Config(format!(
                "program_length_years must be at least 1, got {}",
                self.program_length_years
            )));
        }

        // 2001 is not a leap year, so a valid day here is valid in every year
        validate_month_day("start", self.start_month, self.start_day)?;
        validate_month_day("end", self.end_month, self.end_day)?;

        if !(1..=12).contains(&self.school_year_rollover_month) {
            return Err(AppError::Config(format!(
                "school_year_rollover_month must be 1-12, got {}",
                self.school_year_rollover_month
            )));
        }

        if self.batch_word.trim().is_empty() || self.grade_word.trim().is_empty() {
            return Err(AppError::Config(
                "batch_word and grade_word cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_month_day(field: &str, month: u32, day: u32) -> AppResult<()> {
    if chrono::NaiveDate::from_ymd_opt(2001, month, day).is_none() {
        return Err(AppError::Config(format!(
            "{} date {:02}-{:02} is not a valid month/day",
            field, month, day
        )));
    }
    Ok(())
}

/// Get the application data directory, creating it if needed
///
/// Path structure: {APP_DATA}/schoolhub
pub fn get_app_data_dir() -> AppResult<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Other("Could not determine app data directory".to_string()))?;

    let app_dir = data_dir.join(APP_DIR_NAME);
    std::fs::create_dir_all(&app_dir)?;

    Ok(app_dir)
}

/// Get the config file path: {APP_DATA}/schoolhub/config.json
pub fn get_config_path() -> AppResult<PathBuf> {
    Ok(get_app_data_dir()?.join(CONFIG_FILE_NAME))
}

/// Load batch rules from a JSON file.
///
/// A missing file yields the defaults. Unparseable JSON or rules that
/// fail validation are reported, never silently replaced.
pub fn load_rules(path: &Path) -> AppResult<BatchRules> {
    if !path.exists() {
        debug!("No config at {}, using default batch rules", path.display());
        return Ok(BatchRules::default());
    }

    let raw = std::fs::read_to_string(path)?;
    let rules: BatchRules = serde_json::from_str(&raw)
        .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
    rules.validate()?;

    info!(
        "Loaded batch rules from {} (epoch {}, {} year program)",
        path.display(),
        rules.base_start_year,
        rules.program_length_years
    );
    Ok(rules)
}
