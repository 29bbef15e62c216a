//! Leveled logging with colored output and subscription channels.
//!
//! The engine reports what it does through a [`Logger`] owned by each
//! project. Two channels exist:
//!
//! - `on_any` subscribers see every message regardless of level;
//! - `on_log` subscribers see messages at or above the configured
//!   threshold.
//!
//! Threshold ordering is `Debug < Info < Error < Fatal < None`, with
//! `None` suppressing the filtered channel entirely.

use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

// ============================================================================
// Level
// ============================================================================

/// Message severity, ordered by declaration.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    #[default]
    Info,
    Error,
    Fatal,
    /// Not a message level: as a threshold it suppresses everything.
    None,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::None => "none",
        };
        write!(f, "{name}")
    }
}

/// Apply color to a `[level]` prefix.
fn colorize_prefix(level: Level) -> ColoredString {
    let prefix = format!("[{level}]");
    match level {
        Level::Debug => prefix.bright_blue(),
        Level::Info => prefix.bright_yellow().bold(),
        Level::Error | Level::Fatal => prefix.bright_red().bold(),
        Level::None => prefix.normal(),
    }
}

// ============================================================================
// Logger
// ============================================================================

/// A registered subscriber callback.
pub type Sink = Rc<dyn Fn(Level, &str)>;

/// Threshold-filtered multicast logger.
///
/// Subscribers run in registration order. Cloning a logger shares the
/// registered callbacks; the threshold is copied.
#[derive(Clone)]
pub struct Logger {
    threshold: Level,
    on_any: Vec<Sink>,
    on_log: Vec<Sink>,
}

impl Logger {
    /// Create a logger with no subscribers.
    pub const fn new(threshold: Level) -> Self {
        Self {
            threshold,
            on_any: Vec::new(),
            on_log: Vec::new(),
        }
    }

    /// Create a logger whose filtered channel prints to the terminal.
    pub fn with_terminal(threshold: Level) -> Self {
        let mut logger = Self::new(threshold);
        logger.subscribe(|level, message| {
            println!("{} {message}", colorize_prefix(level));
        });
        logger
    }

    /// The configured threshold.
    pub const fn threshold(&self) -> Level {
        self.threshold
    }

    /// Change the threshold for the filtered channel.
    pub fn set_threshold(&mut self, threshold: Level) {
        self.threshold = threshold;
    }

    /// Subscribe to messages at or above the threshold.
    pub fn subscribe(&mut self, sink: impl Fn(Level, &str) + 'static) {
        self.on_log.push(Rc::new(sink));
    }

    /// Subscribe to every message regardless of level.
    pub fn subscribe_all(&mut self, sink: impl Fn(Level, &str) + 'static) {
        self.on_any.push(Rc::new(sink));
    }

    /// Dispatch a message to both channels.
    pub fn log(&self, level: Level, message: &str) {
        for sink in &self.on_any {
            sink(level, message);
        }

        if self.threshold != Level::None && level != Level::None && level >= self.threshold {
            for sink in &self.on_log {
                sink(level, message);
            }
        }
    }

    /// Log at `Debug`.
    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    /// Log at `Info`.
    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    /// Log at `Error`.
    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    /// Log at `Fatal`.
    pub fn fatal(&self, message: &str) {
        self.log(Level::Fatal, message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::with_terminal(Level::default())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.threshold)
            .field("on_any", &self.on_any.len())
            .field("on_log", &self.on_log.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recording_logger(threshold: Level) -> (Logger, Rc<RefCell<Vec<(Level, String)>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut logger = Logger::new(threshold);
        let sink_seen = Rc::clone(&seen);
        logger.subscribe(move |level, message| {
            sink_seen.borrow_mut().push((level, message.to_owned()));
        });
        (logger, seen)
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Error);
        assert!(Level::Error < Level::Fatal);
        assert!(Level::Fatal < Level::None);
    }

    #[test]
    fn test_threshold_filters_below() {
        let (logger, seen) = recording_logger(Level::Error);
        logger.debug("d");
        logger.info("i");
        logger.error("e");
        logger.fatal("f");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], (Level::Error, "e".to_owned()));
        assert_eq!(seen[1], (Level::Fatal, "f".to_owned()));
    }

    #[test]
    fn test_none_threshold_suppresses_all() {
        let (logger, seen) = recording_logger(Level::None);
        logger.debug("d");
        logger.fatal("f");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_unfiltered_channel_sees_everything() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut logger = Logger::new(Level::Error);
        let sink_seen = Rc::clone(&seen);
        logger.subscribe_all(move |level, _| sink_seen.borrow_mut().push(level));

        logger.debug("d");
        logger.error("e");

        assert_eq!(*seen.borrow(), vec![Level::Debug, Level::Error]);
    }

    #[test]
    fn test_subscribers_run_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut logger = Logger::new(Level::Debug);
        for tag in ["first", "second", "third"] {
            let sink_seen = Rc::clone(&seen);
            logger.subscribe(move |_, _| sink_seen.borrow_mut().push(tag));
        }

        logger.info("go");
        assert_eq!(*seen.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_level_serde() {
        #[derive(Deserialize)]
        struct Holder {
            level: Level,
        }
        let holder: Holder = toml::from_str("level = \"debug\"").unwrap();
        assert_eq!(holder.level, Level::Debug);

        let holder: Holder = toml::from_str("level = \"none\"").unwrap();
        assert_eq!(holder.level, Level::None);

        let result: Result<Holder, _> = toml::from_str("level = \"verbose\"");
        assert!(result.is_err());
    }
}
