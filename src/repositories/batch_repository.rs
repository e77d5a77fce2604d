// src/repositories/batch_repository.rs
//
// Batch persistence

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::batch::Batch;
use crate::error::{AppError, AppResult};

/// Store contract the batch resolver consumes.
///
/// No transactions, no locking: `insert` on an existing id reports
/// `AppError::DuplicateKey` and leaves the stored row untouched.
#[cfg_attr(test, mockall::automock)]
pub trait BatchRepository: Send + Sync {
    /// All stored batches, ordered by start date ascending
    fn find_all(&self) -> AppResult<Vec<Batch>>;

    /// `None` when no batch has this id
    fn find_one(&self, id: &str) -> AppResult<Option<Batch>>;

    /// Store a new batch and return it as persisted
    fn insert(&self, batch: &Batch) -> AppResult<Batch>;
}

pub struct SqliteBatchRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteBatchRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn parse_timestamp(row: &Row, column: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
        let raw: String = row.get(column)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    }

    /// Map database row to Batch - returns rusqlite::Error for query_map compatibility
    fn row_to_batch(row: &Row) -> Result<Batch, rusqlite::Error> {
        Ok(Batch {
            id: row.get("id")?,
            display_name: row.get("display_name")?,
            start_date: Self::parse_timestamp(row, "start_date")?,
            end_date: Self::parse_timestamp(row, "end_date")?,
            active: row.get("active")?,
            notes: row.get("notes")?,
            created_at: Self::parse_timestamp(row, "created_at")?,
            updated_at: Self::parse_timestamp(row, "updated_at")?,
        })
    }
}

/// Primary-key or unique-index collision
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => matches!(
            failure.extended_code,
            rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        ),
        _ => false,
    }
}

impl BatchRepository for SqliteBatchRepository {
    fn find_all(&self) -> AppResult<Vec<Batch>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, display_name, start_date, end_date, active, notes,
                    created_at, updated_at
             FROM batches
             ORDER BY start_date, id",
        )?;

        let batches: Vec<Batch> = stmt
            .query_map([], Self::row_to_batch)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(batches)
    }

    fn find_one(&self, id: &str) -> AppResult<Option<Batch>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, display_name, start_date, end_date, active, notes,
                    created_at, updated_at
             FROM batches WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], Self::row_to_batch) {
            Ok(batch) => Ok(Some(batch)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn insert(&self, batch: &Batch) -> AppResult<Batch> {
        let conn = self.pool.get()?;

        let result = conn.execute(
            "INSERT INTO batches (
                id, display_name, start_date, end_date, active, notes,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                batch.id,
                batch.display_name,
                batch.start_date.to_rfc3339(),
                batch.end_date.to_rfc3339(),
                batch.active,
                batch.notes,
                batch.created_at.to_rfc3339(),
                batch.updated_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => Ok(batch.clone()),
            Err(e) if is_unique_violation(&e) => Err(AppError::DuplicateKey(batch.id.clone())),
            Err(e) => Err(AppError::Database(e)),
        }
    }
}
