use std::fmt::Display;
use std::io::{self, Write};

use chrono::Local;
use log::{set_boxed_logger, set_max_level, Level, LevelFilter, Log, Metadata, Record};

/// Installs a [`Logger`] for `level`. Does nothing if a logger is already installed.
pub fn init(level: LevelFilter) {
    if set_boxed_logger(Box::new(Logger::new(level))).is_ok() {
        set_max_level(level);
    }
}

/// Writes log records to stderr, keeping stdout free for prompts and the scoreboard.
///
/// Records of the taikai crates are shown down to the configured level. Dependencies only get
/// through with warnings and errors.
#[derive(Copy, Clone, Debug)]
pub struct Logger {
    level: LevelFilter,
}

impl Logger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    fn is_own_target(target: &str) -> bool {
        target.starts_with("taikai")
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if Self::is_own_target(metadata.target()) {
            metadata.level() <= self.level
        } else {
            metadata.level() <= Level::Warn && metadata.level() <= self.level
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let now = Local::now().format("%H:%M:%S%.3f");
        let _ = writeln!(io::stderr().lock(), "{}", format_record(now, record));
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Formats a record as `time LEVEL target: message`.
fn format_record<T>(now: T, record: &Record) -> String
where
    T: Display,
{
    format!(
        "{} {:<5} {}: {}",
        now,
        record.level(),
        record.target(),
        record.args()
    )
}
