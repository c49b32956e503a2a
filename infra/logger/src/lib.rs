//! # Logger
//!
//! Installs the global `tracing` subscriber for the settings tools.
//!
//! Console output always goes to **stderr** so that whatever a command prints
//! on stdout (a settings record, a URL, a feed list) can be piped untouched.
//! An optional rolling log file can be added with [`LoggerBuilder::log_dir`].
//! `RUST_LOG` directives are honoured on top of the configured level.
//!
//! ## Example
//!
//! ```rust
//! # use obs_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("obs-site")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 5;
const LOG_FILE_SUFFIX: &str = "log";

/// Maps `-q`/`-v` style counters to a level filter.
///
/// `quiet` wins over `verbose`; zero of both yields `WARN`.
#[must_use]
pub const fn level_for_verbosity(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    ansi: bool,
    level: LevelFilter,
    env_filter: Option<String>,
    log_dir: Option<PathBuf>,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            ansi: true,
            level: LevelFilter::WARN,
            env_filter: None,
            log_dir: None,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}

/// Builder for the global subscriber. A name is required before [`LoggerBuilder::init`].
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName> {
    config: LoggerConfig,
    name: N,
}

impl LoggerBuilder<NoName> {
    /// Sets the logger name, also used as the log file prefix.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder { config: self.config, name: WithName(name.into()) }
    }
}

impl LoggerBuilder<WithName> {
    /// Minimum level emitted when `RUST_LOG` does not say otherwise.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Programmatic filter directives (e.g., `obs_kernel=debug`).
    ///
    /// Invalid directives make [`LoggerBuilder::init`] fail.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    /// Enables or disables the stderr layer.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Enables or disables ANSI colours on the stderr layer.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn ansi(mut self, enabled: bool) -> Self {
        self.config.ansi = enabled;
        self
    }

    /// Also write logs into rolling files under `dir`.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.log_dir = Some(dir.into());
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    /// Writes file logs as JSON lines.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.config.json = enabled;
        self
    }

    /// Installs the global subscriber.
    ///
    /// Keep the returned [`Logger`] alive until exit so buffered file output is flushed.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, `max_files == 0`,
    ///   a bad filter directive, or when no layer is enabled.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already set.
    /// * [`LoggerError::Appender`] if the log file cannot be opened.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let LoggerBuilder { config, name: WithName(name) } = self;
        validate_config(&config, &name)?;

        let filter = build_env_filter(&config)?;
        let mut layers = Vec::new();

        if config.console {
            layers.push(
                layer().compact().with_writer(std::io::stderr).with_ansi(config.ansi).boxed(),
            );
        }

        let guard = if let Some(dir) = &config.log_dir {
            fs::create_dir_all(dir)
                .map_err(|e| LoggerError::Internal {
                    message: e.to_string().into(),
                    context: None,
                })
                .context(format!("Failed to create log directory: {}", dir.display()))?;

            let appender = RollingFileAppender::builder()
                .rotation(config.rotation.clone())
                .filename_prefix(&name)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(config.max_files)
                .build(dir)
                .context("Failed to open log file")?;

            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = layer().with_writer(writer).with_ansi(false);
            layers.push(if config.json { file_layer.json().boxed() } else { file_layer.boxed() });
            Some(guard)
        } else {
            None
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable the console or a log directory."
                    .into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;

        Ok(Logger { name, guard })
    }
}

/// Handle to the installed subscriber. Dropping it flushes file output.
#[must_use = "Dropping this handle stops the background log writer."]
#[derive(Debug)]
pub struct Logger {
    name: String,
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Starts configuring the global subscriber.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a file writer is attached.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!(logger = %self.name, "Flushing log files");
        }
    }
}

fn validate_config(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if config.log_dir.is_some() && config.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    config.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for_verbosity(0, false), LevelFilter::WARN);
        assert_eq!(level_for_verbosity(1, false), LevelFilter::INFO);
        assert_eq!(level_for_verbosity(2, false), LevelFilter::DEBUG);
        assert_eq!(level_for_verbosity(9, false), LevelFilter::TRACE);
        assert_eq!(level_for_verbosity(3, true), LevelFilter::ERROR);
    }

    #[test]
    fn builder_defaults() {
        let builder = Logger::builder().name("obs-site");
        assert!(builder.config.console);
        assert_eq!(builder.config.level, LevelFilter::WARN);
        assert!(builder.config.log_dir.is_none());
        assert_eq!(builder.config.max_files, DEFAULT_MAX_FILES);
    }

    #[test]
    fn builder_records_settings() {
        let builder = Logger::builder()
            .name("obs-site")
            .level(LevelFilter::DEBUG)
            .env_filter("obs_kernel=trace")
            .log_dir("/tmp/obs-logs")
            .max_files(2)
            .json(true);

        assert_eq!(builder.config.level, LevelFilter::DEBUG);
        assert_eq!(builder.config.env_filter.as_deref(), Some("obs_kernel=trace"));
        assert_eq!(builder.config.max_files, 2);
        assert!(builder.config.json);
    }

    #[test]
    #[serial]
    fn empty_name_is_rejected() {
        let err = Logger::builder().name("  ").init().expect_err("empty name must fail");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    #[serial]
    fn no_layers_is_rejected() {
        let err = Logger::builder().name("silent").console(false).init().expect_err("no layers");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    #[serial]
    fn bad_filter_is_rejected() {
        let err = Logger::builder()
            .name("obs-site")
            .env_filter("obs_kernel=loud")
            .init()
            .expect_err("invalid directive");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}
