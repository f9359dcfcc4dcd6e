use chrono::Local;
use std::fmt;

use crate::caller::Caller;
use crate::level::{format_level, Level};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A rendered log entry. Built once at the call site and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    level: Level,
    message: String,
    timestamp: String,
    file: String,
    function: String,
    line: u32,
}

impl Record {
    pub fn new(level: Level, caller: Caller<'_>, args: fmt::Arguments<'_>) -> Record {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        Record::with_timestamp(level, caller, args.to_string(), timestamp)
    }

    pub fn with_timestamp(
        level: Level,
        caller: Caller<'_>,
        message: String,
        timestamp: String,
    ) -> Record {
        Record {
            level,
            message,
            timestamp,
            file: caller.file_base_name().to_string(),
            function: caller.short_function_name().to_string(),
            line: caller.line,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

/// `[2024-01-02 03:04:05] [ INFO] [main.rs:main:12] - message`
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] [{}] [{}:{}:{}] - {}",
            self.timestamp,
            format_level(self.level),
            self.file,
            self.function,
            self.line,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let record = Record::with_timestamp(
            Level::Info,
            Caller::new("src/bin/server.rs", "server::main::{{closure}}", 42),
            "listening on 8080".to_string(),
            "2024-01-02 03:04:05".to_string(),
        );
        assert_eq!(
            record.to_string(),
            "[2024-01-02 03:04:05] [ INFO] [server.rs:main:42] - listening on 8080"
        );
    }

    #[test]
    fn test_blank_caller() {
        let record = Record::with_timestamp(
            Level::Error,
            Caller::default(),
            "boom".to_string(),
            "2024-01-02 03:04:05".to_string(),
        );
        assert_eq!(record.to_string(), "[2024-01-02 03:04:05] [ERROR] [::0] - boom");
    }

    #[test]
    fn test_new_timestamp_format() {
        let record = Record::new(Level::Warn, crate::caller!(), format_args!("{} {}", 1, "x"));
        assert_eq!(record.message(), "1 x");
        assert_eq!(record.timestamp().len(), "2024-01-02 03:04:05".len());
        assert_eq!(record.file(), "record.rs");
        assert_eq!(record.function(), "test_new_timestamp_format");
    }
}
