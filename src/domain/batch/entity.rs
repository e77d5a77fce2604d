use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// An academic cohort ("batch"): every student who entered the
/// program in the same intake year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Canonical identifier: decimal sequence index derived from the intake year
    pub id: String,

    /// Human-readable label, e.g. "Batch 2023-2026"
    pub display_name: String,

    /// Program start (UTC)
    pub start_date: DateTime<Utc>,

    /// Program end (UTC)
    pub end_date: DateTime<Utc>,

    pub active: bool,

    pub notes: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Batch {
    /// Create a new in-memory Batch.
    /// Active, no notes. Not persisted until it goes through the repository.
    pub fn new(
        id: String,
        display_name: String,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            display_name,
            start_date,
            end_date,
            active: true,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Intake year
    pub fn start_year(&self) -> i32 {
        self.start_date.year()
    }

    /// Graduation year
    pub fn end_year(&self) -> i32 {
        self.end_date.year()
    }
}

impl std::fmt::Display for Batch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

/// A batch as described by the resolver.
///
/// `Candidate` is synthesized in memory for a year range with no stored
/// record; `Persisted` was read from (or just written to) the store.
/// The only transition is Candidate -> Persisted, through creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "batch", rename_all = "snake_case")]
pub enum BatchOption {
    Candidate(Batch),
    Persisted(Batch),
}

impl BatchOption {
    pub fn batch(&self) -> &Batch {
        match self {
            BatchOption::Candidate(batch) | BatchOption::Persisted(batch) => batch,
        }
    }

    pub fn into_batch(self) -> Batch {
        match self {
            BatchOption::Candidate(batch) | BatchOption::Persisted(batch) => batch,
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, BatchOption::Persisted(_))
    }
}
