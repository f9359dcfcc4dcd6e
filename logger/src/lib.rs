//! Leveled logging with two interchangeable backends: [`ConsoleLogger`]
//! writes straight to stdout, [`FileLogger`] queues records for a background
//! writer that splits error output into its own file and cuts files by size.
//!
//! ```no_run
//! use cutlog::FileLogger;
//!
//! let logger = FileLogger::new("info", "/var/log/app", "app", 10 * 1024 * 1024)?;
//! cutlog::info!(logger, "listening on {}", 8080);
//! cutlog::error!(logger, "connection lost: {}", "reset by peer");
//! logger.shutdown();
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fmt;
use std::sync::Arc;

pub mod caller;
pub mod config;
pub mod console;
pub mod level;
pub mod log_file;
pub mod log_writer;
pub mod logger;
pub mod record;
pub mod sync_writer;

pub use crate::caller::Caller;
pub use crate::config::FileLoggerConfig;
pub use crate::console::ConsoleLogger;
pub use crate::level::{format_level, level_to_string, parse_level, Level, LevelError};
pub use crate::log_writer::FileLogger;
pub use crate::logger::{init, init_from_env};
pub use crate::record::Record;
pub use crate::sync_writer::SyncFileLogger;

pub trait Logger: Send + Sync {
    fn min_level(&self) -> Level;

    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level()
    }

    fn log(&self, level: Level, caller: Caller<'_>, args: fmt::Arguments<'_>);

    fn flush(&self) {}

    #[track_caller]
    fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Trace, Caller::resolve(), args);
    }

    #[track_caller]
    fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, Caller::resolve(), args);
    }

    #[track_caller]
    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, Caller::resolve(), args);
    }

    #[track_caller]
    fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, Caller::resolve(), args);
    }

    #[track_caller]
    fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, Caller::resolve(), args);
    }
}

impl<L: Logger + ?Sized> Logger for Box<L> {
    fn min_level(&self) -> Level {
        (**self).min_level()
    }

    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }

    fn log(&self, level: Level, caller: Caller<'_>, args: fmt::Arguments<'_>) {
        (**self).log(level, caller, args)
    }

    fn flush(&self) {
        (**self).flush()
    }
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn min_level(&self) -> Level {
        (**self).min_level()
    }

    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }

    fn log(&self, level: Level, caller: Caller<'_>, args: fmt::Arguments<'_>) {
        (**self).log(level, caller, args)
    }

    fn flush(&self) {
        (**self).flush()
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if $crate::Logger::enabled(logger, level) {
            $crate::Logger::log(logger, level, $crate::caller!(), format_args!($($arg)+));
        }
    }};
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log!($logger, $crate::Level::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log!($logger, $crate::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log!($logger, $crate::Level::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect {
        lines: Mutex<Vec<String>>,
    }

    impl Logger for Collect {
        fn min_level(&self) -> Level {
            Level::Debug
        }

        fn log(&self, level: Level, caller: Caller<'_>, args: fmt::Arguments<'_>) {
            if !self.enabled(level) {
                return;
            }
            let record = Record::with_timestamp(level, caller, args.to_string(), "-".into());
            self.lines.lock().unwrap().push(record.to_string());
        }
    }

    #[test]
    fn test_trait_methods_resolve_call_site() {
        let logger = Collect::default();
        logger.trace(format_args!("dropped"));
        logger.info(format_args!("{} + {}", 1, 2));
        let line = line!() - 1;
        let lines = logger.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], format!("[-] [ INFO] [lib.rs::{}] - 1 + 2", line));
    }

    #[test]
    fn test_macros_through_dyn() {
        let logger: Box<dyn Logger> = Box::new(Collect::default());
        crate::debug!(logger, "as {}", "box");
        let shared: Arc<dyn Logger> = Arc::new(Collect::default());
        crate::warn!(shared, "as arc");
        assert!(shared.enabled(Level::Error));
        assert!(!logger.enabled(Level::Trace));
    }

    #[test]
    fn test_macro_caller() {
        let logger = Collect::default();
        crate::error!(logger, "boom");
        let lines = logger.lines.lock().unwrap();
        assert!(lines[0].starts_with("[-] [ERROR] [lib.rs:test_macro_caller:"));
        assert!(lines[0].ends_with("] - boom"));
    }
}
