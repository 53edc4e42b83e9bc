//! Tracing subscriber setup.
//!
//! Installs the global subscriber with an environment-overridable filter,
//! local-time console output, and an optional non-blocking log file.
//! `RUST_LOG` takes precedence over the configured filter.
//!
//! # Example
//!
//! ```ignore
//! use wayfinder::logging::{self, LogConfig};
//!
//! let _guard = logging::init(LogConfig::default())?;
//! tracing::info!("ready");
//! ```
//!
//! The returned [`LogGuard`] must stay alive for the duration of the
//! program; dropping it flushes and stops the file writer.

use std::path::{Path, PathBuf};

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "wayfinder=info";

/// Logging setup errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Init(String),

    /// The log file directory could not be created.
    #[error("failed to prepare log file: {0}")]
    Io(#[from] std::io::Error),
}

/// Logging configuration.
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Filter directives, e.g. `wayfinder=debug`.
    pub filter: String,

    /// Copy output to this file when set.
    pub file: Option<PathBuf>,

    /// ANSI colors on console output.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            file: None,
            ansi: true,
        }
    }
}

impl LogConfig {
    /// Set the filter directives.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Also write log output to the given file.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Enable or disable ANSI colors.
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }
}

/// Keeps the non-blocking file writer alive. Hold this for the program's
/// lifetime.
#[must_use]
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Fails when a subscriber is already installed or the log file's
/// directory cannot be created.
pub fn init(config: LogConfig) -> Result<LogGuard, LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    // Local offset can be indeterminate once threads exist; fall back to UTC
    let timer = OffsetTime::local_rfc_3339()
        .unwrap_or_else(|_| OffsetTime::new(UtcOffset::UTC, Rfc3339));

    // Console output goes to stderr so stdout stays clean for frontends
    let console = tracing_subscriber::fmt::layer()
        .with_timer(timer.clone())
        .with_ansi(config.ansi)
        .with_target(true)
        .with_writer(std::io::stderr);

    let (file_layer, worker) = match &config.file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_timer(timer)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(LogGuard { _worker: worker })
}

fn file_writer(
    path: &Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard), LoggingError> {
    let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(directory) = directory {
        std::fs::create_dir_all(directory)?;
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("wayfinder.log"));
    let appender = tracing_appender::rolling::never(
        directory.unwrap_or_else(|| Path::new(".")),
        file_name,
    );
    Ok(tracing_appender::non_blocking(appender))
}
