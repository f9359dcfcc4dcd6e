use anyhow::Result;
use log::{Metadata, Record};
use std::env;

use crate::caller::{short_function_name, Caller};
use crate::config::FileLoggerConfig;
use crate::console::ConsoleLogger;
use crate::level::Level;
use crate::log_writer::FileLogger;
use crate::Logger;

/// Installs `logger` behind the `log` facade, so `log::info!` and friends
/// from any crate end up in it. Fails if a global logger is already set.
///
/// `log` records carry no function name; the last module path segment is
/// shown in its place.
pub fn init<L: Logger + 'static>(logger: L) -> Result<()> {
    let max_level = logger.min_level().to_level_filter();
    log::set_boxed_logger(Box::new(LogBridge { inner: logger }))?;
    log::set_max_level(max_level);
    Ok(())
}

/// `LOG_DIR` set: a [`FileLogger`] configured from the environment.
/// Otherwise a [`ConsoleLogger`] at `LOG_LEVEL` (default `info`).
pub fn init_from_env() -> Result<()> {
    if env::var_os("LOG_DIR").is_some() {
        let config = FileLoggerConfig::from_env()?;
        std::fs::create_dir_all(&config.directory)?;
        init(FileLogger::from_config(&config)?)
    } else {
        let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());
        init(ConsoleLogger::new(&level)?)
    }
}

struct LogBridge<L> {
    inner: L,
}

impl<L: Logger> log::Log for LogBridge<L> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata.level().into())
    }

    fn log(&self, record: &Record) {
        let level = Level::from(record.level());
        if !self.inner.enabled(level) {
            return;
        }
        let caller = Caller::new(
            record.file().unwrap_or(""),
            record.module_path().map(short_function_name).unwrap_or(""),
            record.line().unwrap_or(0),
        );
        self.inner.log(level, caller, *record.args());
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync_writer::SyncFileLogger;
    use log::Log;
    use std::fs;

    #[test]
    fn test_bridge() {
        let dir = tempfile::tempdir().unwrap();
        let inner = SyncFileLogger::new("info", dir.path(), "app", 1 << 20).unwrap();
        let bridge = LogBridge { inner };
        assert!(!bridge.enabled(&Metadata::builder().level(log::Level::Debug).build()));
        assert!(bridge.enabled(&Metadata::builder().level(log::Level::Warn).build()));

        bridge.log(
            &Record::builder()
                .level(log::Level::Warn)
                .file(Some("src/server/http.rs"))
                .module_path(Some("app::server::http"))
                .line(Some(31))
                .args(format_args!("slow request {}ms", 1200))
                .build(),
        );
        bridge.log(
            &Record::builder()
                .level(log::Level::Debug)
                .args(format_args!("hidden"))
                .build(),
        );
        bridge.log(
            &Record::builder()
                .level(log::Level::Error)
                .args(format_args!("no location"))
                .build(),
        );
        bridge.flush();

        let info = fs::read_to_string(dir.path().join("app.log")).unwrap();
        assert_eq!(info.lines().count(), 1);
        assert!(info.contains("[ WARN] [http.rs:http:31] - slow request 1200ms"));
        let error = fs::read_to_string(dir.path().join("app-error.log")).unwrap();
        assert!(error.contains("[ERROR] [::0] - no location"));
    }
}
