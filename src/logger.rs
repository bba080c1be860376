//! Level-gated logging for the scheduler crate.
//!
//! The crate never talks to hardware; the embedding kernel installs a
//! sink once via [`init`] and every `klog!`-family macro call that passes
//! the level gate is forwarded to it. Without a sink, logging is a no-op.

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use spin::Once;

static SINK_INSTALLED: AtomicBool = AtomicBool::new(false);
static MAX_PRIORITY: AtomicU8 = AtomicU8::new(LogLevel::INFO.priority());
static SINK: Once<LogSink> = Once::new();

/// Output backend installed by the embedder. Receives only records that
/// passed the level gate; formatting and timestamping are its concern.
pub type LogSink = fn(LogLevel, fmt::Arguments);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    FATAL,
    ERROR,
    WARN,
    INFO,
    DEBUG,
    TRACE,
}

/// Declaration order doubles as the numeric priority, most severe first.
const LEVELS: [LogLevel; 6] = [
    LogLevel::FATAL,
    LogLevel::ERROR,
    LogLevel::WARN,
    LogLevel::INFO,
    LogLevel::DEBUG,
    LogLevel::TRACE,
];

impl LogLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::FATAL => "FATAL",
            LogLevel::ERROR => "ERROR",
            LogLevel::WARN => "WARN",
            LogLevel::INFO => "INFO",
            LogLevel::DEBUG => "DEBUG",
            LogLevel::TRACE => "TRACE",
        }
    }

    pub const fn priority(self) -> u8 {
        self as u8
    }

    fn from_priority(value: u8) -> Self {
        LEVELS
            .get(value as usize)
            .copied()
            .unwrap_or(LogLevel::TRACE)
    }

    /// Case-insensitive level name lookup. Accepts "warning" as an
    /// alias for WARN.
    pub fn from_str(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("warning") {
            return Some(LogLevel::WARN);
        }
        LEVELS
            .iter()
            .copied()
            .find(|level| value.eq_ignore_ascii_case(level.as_str()))
    }
}

/// Install the output sink. Only the first call takes effect; returns
/// whether this call was the one that installed it.
pub fn init(sink: LogSink) -> bool {
    let installed = SINK_INSTALLED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok();
    if installed {
        SINK.call_once(|| sink);
    }
    installed
}

pub fn is_initialized() -> bool {
    SINK_INSTALLED.load(Ordering::Relaxed)
}

pub fn log(level: LogLevel, args: fmt::Arguments<'_>) {
    if level.priority() > MAX_PRIORITY.load(Ordering::Relaxed) {
        return;
    }

    if let Some(sink) = SINK.get() {
        sink(level, args);
    }
}

pub fn set_max_level(level: LogLevel) {
    MAX_PRIORITY.store(level.priority(), Ordering::Relaxed);
}

pub fn max_level() -> LogLevel {
    LogLevel::from_priority(MAX_PRIORITY.load(Ordering::Relaxed))
}

/// Scan a kernel command line for a `log=` or `loglevel=` directive.
/// The first token carrying a recognized level wins.
pub fn parse_level_directive(cmdline: &str) -> Option<LogLevel> {
    cmdline
        .split_whitespace()
        .filter_map(|token| token.split_once('='))
        .filter(|(key, _)| key.eq_ignore_ascii_case("log") || key.eq_ignore_ascii_case("loglevel"))
        .find_map(|(_, value)| LogLevel::from_str(value))
}

/// Fixed-width level tag for sink-side line formatting.
pub struct LevelDisplay(pub LogLevel);

impl fmt::Display for LevelDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<5}", self.0.as_str())
    }
}
