use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::record::Record;

pub const INFO_LOG_SUFFIX: &str = ".log";
pub const ERROR_LOG_SUFFIX: &str = "-error.log";
pub const ARCHIVE_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

/// A live log file that is renamed aside ("cut") once it grows too large.
#[derive(Debug)]
pub struct RotatingFile {
    // `None` only between closing and reopening inside `cut`.
    file: Option<File>,
    path: PathBuf,
    archive_prefix: PathBuf,
}

impl RotatingFile {
    /// Opens `<prefix>.log`; archives are named `<prefix>-<timestamp>.log`.
    pub fn open(prefix: &Path) -> Result<RotatingFile> {
        let mut path = prefix.as_os_str().to_owned();
        path.push(INFO_LOG_SUFFIX);
        RotatingFile::open_with_archive(PathBuf::from(path), prefix.to_path_buf())
    }

    fn open_with_archive(path: PathBuf, archive_prefix: PathBuf) -> Result<RotatingFile> {
        let file = open_append(&path)?;
        Ok(RotatingFile {
            file: Some(file),
            path,
            archive_prefix,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the open handle, `None` when it cannot be read.
    pub fn size(&self) -> Option<u64> {
        let file = self.file.as_ref()?;
        match file.metadata() {
            Ok(meta) => Some(meta.len()),
            Err(err) => {
                eprintln!("get file info error: {}: {}", self.path.display(), err);
                None
            }
        }
    }

    pub fn needs_cut(&self, max_file_size: u64) -> bool {
        self.size().map_or(false, |size| size >= max_file_size)
    }

    pub fn archive_path(&self, now: &DateTime<Local>) -> PathBuf {
        let date = now.format(ARCHIVE_DATE_FORMAT).to_string();
        let mut seq = 0;
        loop {
            let mut name = self.archive_prefix.as_os_str().to_owned();
            if seq == 0 {
                name.push(format!("-{}{}", date, INFO_LOG_SUFFIX));
            } else {
                name.push(format!("-{}-{}{}", date, seq, INFO_LOG_SUFFIX));
            }
            let path = PathBuf::from(name);
            if !path.exists() {
                return path;
            }
            seq += 1;
        }
    }

    /// Closes the handle, renames the file to its archive name and reopens the
    /// live name. A failed rename is reported and the old file is reopened.
    pub fn cut(&mut self) -> Result<PathBuf> {
        if let Some(mut file) = self.file.take() {
            if let Err(err) = file.flush() {
                eprintln!("flush log error: {}: {}", self.path.display(), err);
            }
        }
        let archive = self.archive_path(&Local::now());
        if let Err(err) = fs::rename(&self.path, &archive) {
            eprintln!(
                "rename log file error: {} -> {}: {}",
                self.path.display(),
                archive.display(),
                err
            );
        }
        self.file = Some(open_append(&self.path)?);
        Ok(archive)
    }

    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let path = &self.path;
        let file = self
            .file
            .as_mut()
            .with_context(|| format!("log file is closed: {}", path.display()))?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file error: {}", path.display()))
}

/// The info/error file pair of one logger.
#[derive(Debug)]
pub struct LogFiles {
    info: RotatingFile,
    error: RotatingFile,
    max_file_size: u64,
}

impl LogFiles {
    /// Opens `<dir>/<base>.log` and `<dir>/<base>-error.log`.
    pub fn open(directory: &Path, file_name: &str, max_file_size: u64) -> Result<LogFiles> {
        let prefix = directory.join(file_name);
        let info = RotatingFile::open(&prefix)?;
        let mut error_prefix = prefix.as_os_str().to_owned();
        error_prefix.push("-error");
        let error_prefix = PathBuf::from(error_prefix);
        let mut error_path = prefix.into_os_string();
        error_path.push(ERROR_LOG_SUFFIX);
        let error = RotatingFile::open_with_archive(PathBuf::from(error_path), error_prefix)?;
        Ok(LogFiles {
            info,
            error,
            max_file_size,
        })
    }

    pub fn info(&self) -> &RotatingFile {
        &self.info
    }

    pub fn error(&self) -> &RotatingFile {
        &self.error
    }

    /// Routes by tier, cuts the target when it is at or over the limit, then
    /// appends the rendered line. Only a failed reopen is returned as an error.
    pub fn write(&mut self, record: &Record) -> Result<()> {
        let file = if record.level().is_error_tier() {
            &mut self.error
        } else {
            &mut self.info
        };
        if file.needs_cut(self.max_file_size) {
            file.cut()?;
        }
        let line = format!("{}\n", record);
        if let Err(err) = file.write_line(&line) {
            eprintln!("write log error: {}", err);
        }
        Ok(())
    }

    pub fn flush(&mut self) {
        for file in [&mut self.info, &mut self.error] {
            if let Err(err) = file.flush() {
                eprintln!("flush log error: {}", err);
            }
        }
    }
}
