//! Tracing setup for the `portal` binary.
//!
//! Logs go to stderr by default so stdout stays clean for the resolved path
//! (scripts do `cd "$(portal resolve ...)"`). `--log-file` switches to daily
//! rolling files under `~/.portal/logs/`.
//!
//! Level: `warn`, unless `PORTAL_DEBUG_LOG` is truthy or `-v` is passed
//! (then `debug`). `RUST_LOG` overrides the default when set.

use std::env;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const DEBUG_ENV: &str = "PORTAL_DEBUG_LOG";
const LOG_FILE_PREFIX: &str = "portal";
const LOG_FILE_SUFFIX: &str = "log";

/// Installs the global subscriber. Keep the returned guard alive for the
/// life of the process, or buffered file output is lost.
pub fn init(verbose: bool, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let debug_enabled = verbose || env::var(DEBUG_ENV).is_ok_and(|v| is_truthy(&v));

    if let Some(dir) = log_dir {
        match file_appender(dir) {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let installed = tracing_subscriber::fmt()
                    .with_env_filter(filter(debug_enabled))
                    .with_writer(writer)
                    .with_ansi(false)
                    .try_init();
                return installed.ok().map(|_| guard);
            }
            Err(err) => eprintln!("portal: cannot log to {}: {err}", dir.display()),
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(debug_enabled))
        .with_writer(std::io::stderr)
        .try_init();
    None
}

fn filter(debug_enabled: bool) -> EnvFilter {
    if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn file_appender(dir: &Path) -> Result<RollingFileAppender, String> {
    fs_err::create_dir_all(dir).map_err(|e| e.to_string())?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(dir)
        .map_err(|e| e.to_string())
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES")
}
