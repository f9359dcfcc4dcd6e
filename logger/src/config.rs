use anyhow::{anyhow, bail, Context, Result};
use byte_unit::Byte;
use serde::{Deserialize, Deserializer};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::level::{parse_level, Level};
use crate::log_writer::{IDLE_INTERVAL, QUEUE_CAPACITY};

pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1000 * 1000;

#[derive(Clone, Debug, Deserialize)]
pub struct FileLoggerConfig {
    pub level: Level,
    pub directory: PathBuf,
    pub file_name: String,
    #[serde(deserialize_with = "deserialize_size")]
    pub max_file_size: u64,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_idle_interval_ms")]
    pub idle_interval_ms: u64,
}

fn default_queue_capacity() -> usize {
    QUEUE_CAPACITY
}

fn default_idle_interval_ms() -> u64 {
    IDLE_INTERVAL.as_millis() as u64
}

impl FileLoggerConfig {
    pub fn new(
        level: Level,
        directory: impl AsRef<Path>,
        file_name: &str,
        max_file_size: u64,
    ) -> FileLoggerConfig {
        FileLoggerConfig {
            level,
            directory: directory.as_ref().to_owned(),
            file_name: file_name.to_string(),
            max_file_size,
            queue_capacity: QUEUE_CAPACITY,
            idle_interval_ms: default_idle_interval_ms(),
        }
    }

    /// Reads `LOG_LEVEL`, `LOG_DIR`, `LOG_FILE`, `LOG_MAX_FILE_SIZE` and
    /// `LOG_QUEUE_CAPACITY`.
    pub fn from_env() -> Result<FileLoggerConfig> {
        FileLoggerConfig::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<FileLoggerConfig> {
        let level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_owned());
        let level = parse_level(&level)?;
        let directory = lookup("LOG_DIR").unwrap_or_else(|| ".".to_owned());
        let file_name = lookup("LOG_FILE").unwrap_or_else(|| "log".to_owned());
        let max_file_size = match lookup("LOG_MAX_FILE_SIZE") {
            Some(size) => parse_size(&size).context("LOG_MAX_FILE_SIZE")?,
            None => DEFAULT_MAX_FILE_SIZE,
        };
        let queue_capacity = match lookup("LOG_QUEUE_CAPACITY") {
            Some(capacity) => capacity
                .trim()
                .parse()
                .with_context(|| format!("LOG_QUEUE_CAPACITY: {:?}", capacity))?,
            None => QUEUE_CAPACITY,
        };
        let mut config = FileLoggerConfig::new(level, directory, &file_name, max_file_size);
        config.queue_capacity = queue_capacity;
        config.validate()?;
        Ok(config)
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.level == Level::Unknown {
            bail!("log level is not set");
        }
        if self.queue_capacity == 0 {
            bail!("queue capacity must be greater than 0");
        }
        Ok(())
    }
}

/// Parses `512`, `64KB`, `10MB`, `1GiB`... KB is 1000 bytes, KiB 1024.
pub fn parse_size(s: &str) -> Result<u64> {
    Byte::from_str(s.trim())
        .map(|b| b.get_bytes())
        .map_err(|e| anyhow!("invalid size {:?}: {:?}", s, e))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Bytes(u64),
    Text(String),
}

fn deserialize_size<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match SizeValue::deserialize(deserializer)? {
        SizeValue::Bytes(v) => Ok(v),
        SizeValue::Text(s) => parse_size(&s).map_err(serde::de::Error::custom),
    }
}
