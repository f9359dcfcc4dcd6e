use anyhow::Result;
use colored::Colorize;
use std::fmt;
use std::io::{self, IsTerminal, Write};

use crate::caller::Caller;
use crate::level::{parse_level, Level};
use crate::record::Record;
use crate::Logger;

/// Writes each record straight to stdout. Errors are red and warnings yellow.
///
/// Color is on only when stdout is a terminal, so piped output stays plain.
/// `colored`'s own switches (`NO_COLOR`, `CLICOLOR_FORCE`,
/// `colored::control::set_override`) still apply on top of that, and
/// `with_color(false)` turns it off for this logger.
#[derive(Clone, Debug)]
pub struct ConsoleLogger {
    level: Level,
    color: bool,
}

impl ConsoleLogger {
    pub fn new(level: &str) -> Result<ConsoleLogger> {
        Ok(ConsoleLogger {
            level: parse_level(level)?,
            color: io::stdout().is_terminal(),
        })
    }

    pub fn with_color(mut self, color: bool) -> ConsoleLogger {
        self.color = color;
        self
    }

    fn render(&self, record: &Record) -> String {
        let line = record.to_string();
        if !self.color {
            return line;
        }
        match record.level() {
            Level::Error => line.red().to_string(),
            Level::Warn => line.yellow().to_string(),
            _ => line,
        }
    }

    fn write_to<W: Write>(&self, out: &mut W, record: &Record) -> io::Result<()> {
        writeln!(out, "{}", self.render(record))
    }
}

impl Logger for ConsoleLogger {
    fn min_level(&self) -> Level {
        self.level
    }

    fn log(&self, level: Level, caller: Caller<'_>, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        let record = Record::new(level, caller, args);
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let _ = self.write_to(&mut out, &record);
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}
