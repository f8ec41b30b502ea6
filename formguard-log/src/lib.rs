//! Formguard Logging
//!
//! Structured logging for the formguard workspace, controlled through the
//! `FORMGUARD_*` environment variables.
//!
//! # Features
//!
//! - **Environment-controlled**: `FORMGUARD_DEBUG=1` enables debug logging
//! - **Structured fields**: `{ key = value }` pairs rendered next to the message
//! - **Multiple backends**: can stand in as the `log` crate's logger and
//!   optionally build a `tracing` subscriber
//!
//! # Usage
//!
//! ```rust
//! use formguard_log::{debug, info, trace};
//!
//! info!("Form opened");
//! debug!(target: "formguard::engine", "Field blurred: {}", "email");
//!
//! let field = "email";
//! trace!(target: "formguard::engine", { field = field, touched = true }, "error stored");
//! ```
//!
//! # Environment Variables
//!
//! - `FORMGUARD_DEBUG=1` - Enable debug logging
//! - `FORMGUARD_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `FORMGUARD_LOG_FORMAT=pretty|json|compact` - Set output format
//! - `FORMGUARD_LOG_TIMESTAMPS=1|0` - Include timestamps

use once_cell::sync::Lazy;
use std::env;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

// ============================================================================
// Log Levels
// ============================================================================

/// Log level, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    /// No logging at all
    Off = 5,
}

impl Level {
    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Off,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<::log::Level> for Level {
    fn from(level: ::log::Level) -> Self {
        match level {
            ::log::Level::Error => Level::Error,
            ::log::Level::Warn => Level::Warn,
            ::log::Level::Info => Level::Info,
            ::log::Level::Debug => Level::Debug,
            ::log::Level::Trace => Level::Trace,
        }
    }
}

// ============================================================================
// Output Format
// ============================================================================

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Full timestamp, padded level, bracketed target
    Pretty,
    /// Short time, one-letter level
    Compact,
    /// One JSON object per line
    Json,
}

impl Format {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Global Configuration
// ============================================================================

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

static CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::from_env);

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether debug mode is enabled
    pub debug: bool,
    /// Minimum log level
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Whether to include timestamps
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Json,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Read the configuration from `FORMGUARD_*` environment variables and
    /// publish its level and debug flag to the global switches.
    pub fn from_env() -> Self {
        let debug = env_flag("FORMGUARD_DEBUG").unwrap_or(false);

        let level = env::var("FORMGUARD_LOG_LEVEL")
            .ok()
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { Level::Info });

        let format = env::var("FORMGUARD_LOG_FORMAT")
            .ok()
            .and_then(|s| Format::parse(&s))
            .unwrap_or(Format::Json);

        let timestamps = env_flag("FORMGUARD_LOG_TIMESTAMPS").unwrap_or(true);

        DEBUG_ENABLED.store(debug, Ordering::SeqCst);
        LOG_LEVEL.store(level as u8, Ordering::SeqCst);

        Self {
            debug,
            level,
            format,
            timestamps,
        }
    }
}

fn env_flag(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

// ============================================================================
// Public API
// ============================================================================

/// Initialize the logging system eagerly.
///
/// The first log line does this implicitly.
pub fn init() {
    Lazy::force(&CONFIG);
}

/// Get the global configuration.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

#[inline]
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    level != Level::Off && level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

/// Whether a line at `level` would be written. Debug lines are also let
/// through by the debug flag.
#[inline]
pub fn enabled(level: Level) -> bool {
    init();
    is_level_enabled(level) || (level == Level::Debug && is_debug_enabled())
}

pub fn current_level() -> Level {
    Level::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Set log level at runtime.
pub fn set_level(level: Level) {
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Enable or disable debug mode at runtime.
pub fn set_debug(enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    if enabled && current_level() > Level::Debug {
        set_level(Level::Debug);
    }
}

// ============================================================================
// Output
// ============================================================================

/// Write one log line. Called by the macros.
#[doc(hidden)]
pub fn emit(level: Level, target: &str, message: &str, fields: &[(&str, String)]) {
    if !enabled(level) {
        return;
    }

    let config = config();
    let line = match config.format {
        Format::Pretty => render_text(level, target, message, fields, config, false),
        Format::Compact => render_text(level, target, message, fields, config, true),
        Format::Json => render_json(level, target, message, fields),
    };

    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "{}", line);
}

fn render_text(
    level: Level,
    target: &str,
    message: &str,
    fields: &[(&str, String)],
    config: &LogConfig,
    compact: bool,
) -> String {
    let mut line = String::new();

    if config.timestamps {
        let now = chrono::Local::now();
        let stamp = if compact {
            now.format("%H:%M:%S")
        } else {
            now.format("%Y-%m-%d %H:%M:%S%.3f")
        };
        line.push_str(&format!("{} ", stamp));
    }

    if compact {
        line.push(level.as_str().chars().next().unwrap_or('?'));
        line.push(' ');
        if !target.is_empty() {
            line.push_str(&format!("{}: ", target));
        }
    } else {
        line.push_str(&format!("{:5} ", level.as_str()));
        if !target.is_empty() {
            line.push_str(&format!("[{}] ", target));
        }
    }

    line.push_str(message);
    for (key, value) in fields {
        line.push_str(&format!(" {}={}", key, value));
    }
    line
}

#[cfg(feature = "json")]
fn render_json(level: Level, target: &str, message: &str, fields: &[(&str, String)]) -> String {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Entry<'a> {
        timestamp: String,
        level: &'a str,
        target: &'a str,
        message: &'a str,
        #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
        fields: serde_json::Map<String, serde_json::Value>,
    }

    let entry = Entry {
        timestamp: chrono::Utc::now().to_rfc3339(),
        level: level.as_str(),
        target,
        message,
        fields: fields
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
            .collect(),
    };

    serde_json::to_string(&entry).unwrap_or_else(|_| message.to_string())
}

#[cfg(not(feature = "json"))]
fn render_json(level: Level, target: &str, message: &str, fields: &[(&str, String)]) -> String {
    let mut line = format!(
        r#"{{"timestamp":"{}","level":"{}","target":"{}","message":"{}""#,
        chrono::Utc::now().to_rfc3339(),
        level.as_str(),
        escape_json(target),
        escape_json(message)
    );
    if !fields.is_empty() {
        let pairs: Vec<String> = fields
            .iter()
            .map(|(k, v)| format!(r#""{}":"{}""#, escape_json(k), escape_json(v)))
            .collect();
        line.push_str(&format!(r#","fields":{{{}}}"#, pairs.join(",")));
    }
    line.push('}');
    line
}

#[cfg(not(feature = "json"))]
fn escape_json(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => result.push_str(&format!("\\u{:04x}", c as u32)),
            c => result.push(c),
        }
    }
    result
}

// ============================================================================
// `log` crate bridge
// ============================================================================

/// Adapter that routes records from the `log` facade through formguard's
/// formatter and level switches.
pub struct Logger;

impl ::log::Log for Logger {
    fn enabled(&self, metadata: &::log::Metadata<'_>) -> bool {
        enabled(metadata.level().into())
    }

    fn log(&self, record: &::log::Record<'_>) {
        if self.enabled(record.metadata()) {
            emit(
                record.level().into(),
                record.target(),
                &record.args().to_string(),
                &[],
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: Logger = Logger;

/// Install [`Logger`] as the process-wide `log` logger.
///
/// Optional: formguard's own macros never go through `log`. Call this only to
/// route other crates' `log` records through the same formatter. Fails if a
/// logger is already installed.
pub fn install() -> Result<(), ::log::SetLoggerError> {
    init();
    ::log::set_logger(&LOGGER)?;
    ::log::set_max_level(::log::LevelFilter::Trace);
    Ok(())
}

// ============================================================================
// Macros
// ============================================================================

#[doc(hidden)]
#[macro_export]
macro_rules! __event {
    ($level:expr, $target:expr, { $($key:ident = $val:expr),* }, $($arg:tt)+) => {
        if $crate::enabled($level) {
            $crate::emit(
                $level,
                $target,
                &format!($($arg)+),
                &[$((stringify!($key), ($val).to_string())),*],
            );
        }
    };
}

/// Log a trace message.
#[macro_export]
macro_rules! trace {
    (target: $target:expr, { $($key:ident = $val:expr),+ $(,)? }, $($arg:tt)+) => {
        $crate::__event!($crate::Level::Trace, $target, { $($key = $val),+ }, $($arg)+)
    };
    (target: $target:expr, $($arg:tt)+) => {
        $crate::__event!($crate::Level::Trace, $target, {}, $($arg)+)
    };
    ({ $($key:ident = $val:expr),+ $(,)? }, $($arg:tt)+) => {
        $crate::__event!($crate::Level::Trace, module_path!(), { $($key = $val),+ }, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__event!($crate::Level::Trace, module_path!(), {}, $($arg)+)
    };
}

/// Log a debug message.
///
/// Written when `FORMGUARD_DEBUG=1` or the level is `debug` or lower.
///
/// # Example
///
/// ```rust
/// use formguard_log::debug;
///
/// debug!("Rule set rebuilt");
/// debug!(target: "formguard::engine", { fields = 3 }, "validate_all finished");
/// ```
#[macro_export]
macro_rules! debug {
    (target: $target:expr, { $($key:ident = $val:expr),+ $(,)? }, $($arg:tt)+) => {
        $crate::__event!($crate::Level::Debug, $target, { $($key = $val),+ }, $($arg)+)
    };
    (target: $target:expr, $($arg:tt)+) => {
        $crate::__event!($crate::Level::Debug, $target, {}, $($arg)+)
    };
    ({ $($key:ident = $val:expr),+ $(,)? }, $($arg:tt)+) => {
        $crate::__event!($crate::Level::Debug, module_path!(), { $($key = $val),+ }, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__event!($crate::Level::Debug, module_path!(), {}, $($arg)+)
    };
}

/// Log an info message.
#[macro_export]
macro_rules! info {
    (target: $target:expr, { $($key:ident = $val:expr),+ $(,)? }, $($arg:tt)+) => {
        $crate::__event!($crate::Level::Info, $target, { $($key = $val),+ }, $($arg)+)
    };
    (target: $target:expr, $($arg:tt)+) => {
        $crate::__event!($crate::Level::Info, $target, {}, $($arg)+)
    };
    ({ $($key:ident = $val:expr),+ $(,)? }, $($arg:tt)+) => {
        $crate::__event!($crate::Level::Info, module_path!(), { $($key = $val),+ }, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__event!($crate::Level::Info, module_path!(), {}, $($arg)+)
    };
}

/// Log a warning message.
#[macro_export]
macro_rules! warn {
    (target: $target:expr, { $($key:ident = $val:expr),+ $(,)? }, $($arg:tt)+) => {
        $crate::__event!($crate::Level::Warn, $target, { $($key = $val),+ }, $($arg)+)
    };
    (target: $target:expr, $($arg:tt)+) => {
        $crate::__event!($crate::Level::Warn, $target, {}, $($arg)+)
    };
    ({ $($key:ident = $val:expr),+ $(,)? }, $($arg:tt)+) => {
        $crate::__event!($crate::Level::Warn, module_path!(), { $($key = $val),+ }, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__event!($crate::Level::Warn, module_path!(), {}, $($arg)+)
    };
}

/// Log an error message.
#[macro_export]
macro_rules! error {
    (target: $target:expr, { $($key:ident = $val:expr),+ $(,)? }, $($arg:tt)+) => {
        $crate::__event!($crate::Level::Error, $target, { $($key = $val),+ }, $($arg)+)
    };
    (target: $target:expr, $($arg:tt)+) => {
        $crate::__event!($crate::Level::Error, $target, {}, $($arg)+)
    };
    ({ $($key:ident = $val:expr),+ $(,)? }, $($arg:tt)+) => {
        $crate::__event!($crate::Level::Error, module_path!(), { $($key = $val),+ }, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__event!($crate::Level::Error, module_path!(), {}, $($arg)+)
    };
}

// ============================================================================
// Tracing Integration
// ============================================================================

#[cfg(feature = "tracing")]
pub mod tracing_compat {
    //! Build a `tracing` subscriber that follows `FORMGUARD_LOG_LEVEL`.

    use super::*;

    /// Subscriber filtered by `RUST_LOG` when set, else by the formguard level.
    pub fn subscriber() -> impl tracing::Subscriber {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{EnvFilter, fmt};

        let level = config().level.as_str().to_lowercase();
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(false))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Off);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(Level::parse("debug"), Some(Level::Debug));
        assert_eq!(Level::parse(" TRACE "), Some(Level::Trace));
        assert_eq!(Level::parse("warning"), Some(Level::Warn));
        assert_eq!(Level::parse("none"), Some(Level::Off));
        assert_eq!(Level::parse("verbose"), None);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(Format::parse("pretty"), Some(Format::Pretty));
        assert_eq!(Format::parse("Compact"), Some(Format::Compact));
        assert_eq!(Format::parse("json"), Some(Format::Json));
        assert_eq!(Format::parse("xml"), None);
    }

    #[test]
    fn test_from_log_level() {
        assert_eq!(Level::from(::log::Level::Warn), Level::Warn);
        assert_eq!(Level::from(::log::Level::Trace), Level::Trace);
    }

    #[test]
    fn test_off_is_never_enabled() {
        assert!(!is_level_enabled(Level::Off));
    }

    #[test]
    fn test_text_rendering_appends_fields() {
        let config = LogConfig {
            timestamps: false,
            ..LogConfig::default()
        };
        let fields = [("field", "email".to_string()), ("touched", "true".to_string())];

        let pretty = render_text(Level::Debug, "formguard::engine", "blur", &fields, &config, false);
        assert_eq!(pretty, "DEBUG [formguard::engine] blur field=email touched=true");

        let compact = render_text(Level::Warn, "t", "msg", &[], &config, true);
        assert_eq!(compact, "W t: msg");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_rendering() {
        let line = render_json(Level::Info, "t", "hello \"x\"", &[("n", "3".to_string())]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["message"], "hello \"x\"");
        assert_eq!(parsed["fields"]["n"], "3");

        let bare = render_json(Level::Info, "t", "plain", &[]);
        let parsed: serde_json::Value = serde_json::from_str(&bare).unwrap();
        assert!(parsed.get("fields").is_none());
    }

    #[test]
    fn test_macros_compile() {
        trace!("trace message");
        debug!("debug message");
        info!("info message");
        warn!("warn message");
        error!("error message");

        debug!(target: "test", "with target {}", 1);
        info!(target: "test", { field = "email", count = 2 }, "with fields");
        warn!({ ok = false }, "fields without target");
    }

    #[test]
    fn test_install_log_bridge() {
        install().unwrap();
        assert_eq!(::log::max_level(), ::log::LevelFilter::Trace);

        ::log::info!(target: "formguard::test", "routed through the bridge");

        // The process-wide logger can only be set once.
        assert!(install().is_err());
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn test_tracing_subscriber() {
        let answer = tracing::subscriber::with_default(tracing_compat::subscriber(), || {
            tracing::info!(target: "formguard::test", "inside subscriber");
            42
        });
        assert_eq!(answer, 42);
    }
}
