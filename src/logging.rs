// src/logging.rs
//
// Logging bootstrap
//
// Library code only talks to the `log` facade. The binary calls
// `init_logging` once to install the flexi_logger backend on stderr.

use flexi_logger::{Logger, LoggerHandle};
use log::info;
use once_cell::sync::OnceCell;

/// Environment variable that overrides the log level
pub const LOG_LEVEL_ENV: &str = "SCHOOLHUB_LOG";

static LOGGER: OnceCell<(&'static str, LoggerHandle)> = OnceCell::new();

/// Install the stderr logger. Repeated calls with the same level are no-ops;
/// switching levels after startup is rejected.
pub fn init_logging(level: &str) -> Result<(), String> {
    let level = normalize_level(level)?;

    let (active, _) = LOGGER.get_or_try_init(|| -> Result<_, String> {
        let handle = Logger::try_with_str(level)
            .map_err(|err| format!("invalid log level `{level}`: {err}"))?
            .log_to_stderr()
            .format(flexi_logger::detailed_format)
            .start()
            .map_err(|err| format!("failed to start logger: {err}"))?;

        info!(
            "Logging initialized (level={}, version={})",
            level,
            env!("CARGO_PKG_VERSION")
        );
        Ok((level, handle))
    })?;

    if *active != level {
        return Err(format!(
            "logging already initialized with level `{active}`; refusing to switch to `{level}`"
        ));
    }

    Ok(())
}

/// Level from `SCHOOLHUB_LOG`, else `info`
pub fn level_from_env() -> String {
    std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "info".to_string())
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}
