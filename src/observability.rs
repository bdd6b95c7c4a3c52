// In: src/observability.rs

//! Logging setup and structured metrics for the ingestion core.
//!
//! Library code only talks to the `log` facade. A host that wants to see those
//! records calls `init_logging` once (the Python module does so from
//! `enable_verbose_logging`); everything after the first call is a no-op.
//!
//! `log_metric!` prints structured key/value lines and is compiled out of release
//! builds.

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Once;

use log::LevelFilter;

use crate::error::IngestError;

/// Logs a structured key-value metric string to stdout, only in debug builds.
///
/// # Example
/// ```
/// use qdb_ingest::log_metric;
/// let rows = 4;
/// log_metric!("event"="batch_push", "rows"=&rows);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            println!("QDB_INGEST_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs a global `env_logger` printing `[LEVEL] message` lines.
///
/// With `log_file`, records are appended to that file instead of stderr. Only the
/// first call has any effect; a logger installed by someone else is left in place.
pub fn init_logging(level: LevelFilter, log_file: Option<&str>) -> Result<(), IngestError> {
    // Open the file up front so that a bad path is reported to the caller.
    let file = log_file
        .map(|path| OpenOptions::new().append(true).create(true).open(path))
        .transpose()?;

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.is_test(false);
        builder.filter_level(level);
        builder.format(|buf, record| {
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        if builder.try_init().is_err() {
            log::debug!("a global logger is already installed; keeping it");
        }
    });
    Ok(())
}
