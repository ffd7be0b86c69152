//! Log forwarding from the parser to a caller-supplied sink.
//!
//! The parser reports diagnostics as `(level, message, path)` events. Callers
//! receive them by handing a `LogSink` to the parse call; nothing is
//! registered globally. Forwarding is synchronous and happens on the thread
//! running the parse, so a sink must not call back into the parser.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use yangtree::log::{LogBridge, LogLevel};
//!
//! let seen = RefCell::new(Vec::new());
//! let sink = |level: LogLevel, msg: &str, _path: Option<&str>| {
//!     seen.borrow_mut().push((level, msg.to_string()));
//! };
//!
//! let bridge = LogBridge::new(Some(&sink));
//! bridge.forward(LogLevel::Warning, "unknown element", Some("/m:top"));
//! assert_eq!(seen.borrow().len(), 1);
//!
//! // No sink: forwarding does nothing.
//! LogBridge::disabled().forward(LogLevel::Error, "dropped", None);
//! ```

mod tracing_sink;

pub use tracing_sink::TracingSink;

use std::fmt;
use std::str::FromStr;

/// Severity of a log event, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Error,
    Warning,
    Verbose,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "verbose" | "info" => Ok(LogLevel::Verbose),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Receiver of parser diagnostics.
///
/// Implemented for any `Fn(LogLevel, &str, Option<&str>)`, so a closure can be
/// passed directly.
pub trait LogSink {
    /// Handles one event. `path` is the data path of the node the event is
    /// about, when one is known.
    fn log(&self, level: LogLevel, message: &str, path: Option<&str>);
}

impl<F> LogSink for F
where
    F: Fn(LogLevel, &str, Option<&str>),
{
    fn log(&self, level: LogLevel, message: &str, path: Option<&str>) {
        self(level, message, path)
    }
}

/// Forwards events to an optional sink without filtering or buffering.
///
/// The bridge borrows the sink; it never owns it.
#[derive(Clone, Copy)]
pub struct LogBridge<'a> {
    sink: Option<&'a dyn LogSink>,
}

impl<'a> LogBridge<'a> {
    pub fn new(sink: Option<&'a dyn LogSink>) -> Self {
        Self { sink }
    }

    /// A bridge with no sink attached.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    /// Returns true if a sink is attached.
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Passes the event to the sink unchanged. No-op without a sink.
    pub fn forward(&self, level: LogLevel, message: &str, path: Option<&str>) {
        if let Some(sink) = self.sink {
            sink.log(level, message, path);
        }
    }

    pub fn error(&self, message: &str, path: Option<&str>) {
        self.forward(LogLevel::Error, message, path);
    }

    pub fn warning(&self, message: &str, path: Option<&str>) {
        self.forward(LogLevel::Warning, message, path);
    }

    pub fn verbose(&self, message: &str, path: Option<&str>) {
        self.forward(LogLevel::Verbose, message, path);
    }

    pub fn debug(&self, message: &str, path: Option<&str>) {
        self.forward(LogLevel::Debug, message, path);
    }
}

impl fmt::Debug for LogBridge<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogBridge")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    type Event = (LogLevel, String, Option<String>);

    #[test]
    fn test_forward_passes_all_fields_unchanged() {
        let events: RefCell<Vec<Event>> = RefCell::new(Vec::new());
        let sink = |level: LogLevel, msg: &str, path: Option<&str>| {
            events
                .borrow_mut()
                .push((level, msg.to_string(), path.map(str::to_string)));
        };

        let bridge = LogBridge::new(Some(&sink));
        bridge.forward(LogLevel::Error, "bad value", Some("/m:c/leaf"));
        bridge.forward(LogLevel::Debug, "done", None);

        let events = events.into_inner();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            (
                LogLevel::Error,
                "bad value".to_string(),
                Some("/m:c/leaf".to_string())
            )
        );
        assert_eq!(events[1], (LogLevel::Debug, "done".to_string(), None));
    }

    #[test]
    fn test_forward_without_sink_is_noop() {
        let bridge = LogBridge::disabled();
        assert!(!bridge.is_enabled());
        bridge.error("nobody listens", None);
    }

    #[test]
    fn test_shorthand_levels() {
        let levels = RefCell::new(Vec::new());
        let sink = |level: LogLevel, _: &str, _: Option<&str>| levels.borrow_mut().push(level);
        let bridge = LogBridge::new(Some(&sink));

        bridge.error("e", None);
        bridge.warning("w", None);
        bridge.verbose("v", None);
        bridge.debug("d", None);

        assert_eq!(
            levels.into_inner(),
            vec![
                LogLevel::Error,
                LogLevel::Warning,
                LogLevel::Verbose,
                LogLevel::Debug
            ]
        );
    }

    #[test]
    fn test_level_ordering_and_parsing() {
        assert!(LogLevel::Error < LogLevel::Warning);
        assert!(LogLevel::Verbose < LogLevel::Debug);
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Verbose.to_string(), "verbose");
    }
}
