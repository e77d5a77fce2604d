// src/main.rs
//
// Bootstraps storage and prints the current batch option window as JSON.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::info;

use schoolhub::application::commands::list_options;
use schoolhub::application::AppState;
use schoolhub::config::{get_config_path, load_rules};
use schoolhub::db::{
    create_connection_pool, get_connection, get_database_path, get_database_stats,
    initialize_database, verify_database_integrity,
};
use schoolhub::logging::{init_logging, level_from_env};

fn main() -> Result<()> {
    // 1. LOGGING
    init_logging(&level_from_env()).map_err(|e| anyhow!(e))?;

    // 2. CONFIGURATION
    let config_path = get_config_path()?;
    let rules = load_rules(&config_path)
        .with_context(|| format!("loading rules from {}", config_path.display()))?;

    // 3. INFRASTRUCTURE
    let db_path = get_database_path()?;
    let pool = Arc::new(create_connection_pool(&db_path)?);

    // Initialize schema (idempotent)
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
        verify_database_integrity(&conn)?;

        let stats = get_database_stats(&conn)?;
        info!(
            "Database ready at {} ({} batches, {} bytes)",
            db_path.display(),
            stats.batch_count,
            stats.size_bytes
        );
    }

    // 4. STATE
    let state = AppState::new(pool, rules);

    let options = list_options(&state, None, None).map_err(|e| anyhow!(e.message))?;
    println!("{}", serde_json::to_string_pretty(&options)?);

    Ok(())
}
