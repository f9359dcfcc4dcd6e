use anyhow::Result;
use std::fmt;
use std::path::Path;
use std::process;
use std::sync::{Mutex, MutexGuard};

use crate::caller::Caller;
use crate::level::{parse_level, Level};
use crate::log_file::LogFiles;
use crate::record::Record;
use crate::Logger;

/// Same files and rotation as [`FileLogger`](crate::FileLogger), written on
/// the calling thread under a lock.
pub struct SyncFileLogger {
    level: Level,
    files: Mutex<LogFiles>,
}

impl SyncFileLogger {
    pub fn new(
        level: &str,
        directory: impl AsRef<Path>,
        file_name: &str,
        max_file_size: u64,
    ) -> Result<SyncFileLogger> {
        let level = parse_level(level)?;
        let files = LogFiles::open(directory.as_ref(), file_name, max_file_size)?;
        Ok(SyncFileLogger {
            level,
            files: Mutex::new(files),
        })
    }

    fn files(&self) -> MutexGuard<'_, LogFiles> {
        match self.files.lock() {
            Ok(files) => files,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Logger for SyncFileLogger {
    fn min_level(&self) -> Level {
        self.level
    }

    fn log(&self, level: Level, caller: Caller<'_>, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        let record = Record::new(level, caller, args);
        if let Err(err) = self.files().write(&record) {
            eprintln!("{:#}", err);
            process::abort();
        }
    }

    fn flush(&self) {
        self.files().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_write_and_route() {
        let dir = tempfile::tempdir().unwrap();
        let logger = SyncFileLogger::new("debug", dir.path(), "app", 1 << 20).unwrap();
        crate::trace!(logger, "hidden");
        crate::debug!(logger, "visible {}", 1);
        crate::error!(logger, "failed: {}", "disk");
        let info = fs::read_to_string(dir.path().join("app.log")).unwrap();
        let error = fs::read_to_string(dir.path().join("app-error.log")).unwrap();
        assert_eq!(info.lines().count(), 1);
        assert!(info.contains("[DEBUG] [sync_writer.rs:test_write_and_route:"));
        assert!(info.contains("- visible 1"));
        assert_eq!(error.lines().count(), 1);
        assert!(error.contains("[ERROR]"));
        assert!(error.contains("- failed: disk"));
    }

    #[test]
    fn test_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let logger = SyncFileLogger::new("info", dir.path(), "app", 100).unwrap();
        for i in 0..10 {
            crate::info!(logger, "line {}", i);
            let size = fs::metadata(dir.path().join("app.log")).unwrap().len();
            assert!(size < 200);
        }
        let files = fs::read_dir(dir.path()).unwrap().count();
        assert!(files > 2);
    }

    #[test]
    fn test_invalid_level() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SyncFileLogger::new("", dir.path(), "app", 100).is_err());
    }
}
