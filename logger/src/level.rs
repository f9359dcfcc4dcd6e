use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Width of the level column in a rendered line.
pub const LEVEL_WIDTH: usize = 5;

/// Severity scale, ordered by declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
#[repr(u8)]
pub enum Level {
    Unknown = 0,
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    UnknownName(String),
    Unmapped(u8),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::UnknownName(name) => write!(f, "unknown log level: {:?}", name),
            LevelError::Unmapped(value) => write!(f, "log level {} has no name", value),
        }
    }
}

impl std::error::Error for LevelError {}

impl Level {
    pub const NAMED: [Level; 5] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
    ];

    pub fn is_error_tier(self) -> bool {
        self >= Level::Error
    }
}

/// Case-insensitive lookup of a level name.
pub fn parse_level(name: &str) -> Result<Level, LevelError> {
    match name.to_ascii_uppercase().as_str() {
        "TRACE" => Ok(Level::Trace),
        "DEBUG" => Ok(Level::Debug),
        "INFO" => Ok(Level::Info),
        "WARN" => Ok(Level::Warn),
        "ERROR" => Ok(Level::Error),
        _ => Err(LevelError::UnknownName(name.to_string())),
    }
}

pub fn level_to_string(level: Level) -> Result<&'static str, LevelError> {
    match level {
        Level::Trace => Ok("TRACE"),
        Level::Debug => Ok("DEBUG"),
        Level::Info => Ok("INFO"),
        Level::Warn => Ok("WARN"),
        Level::Error => Ok("ERROR"),
        Level::Unknown => Err(LevelError::Unmapped(Level::Unknown as u8)),
    }
}

/// Right-justifies the level name to [`LEVEL_WIDTH`] columns, e.g. `" INFO"`.
pub fn format_level(level: Level) -> String {
    let name = level_to_string(level).unwrap_or("");
    format!("{:>width$}", name, width = LEVEL_WIDTH)
}

impl FromStr for Level {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_level(s)
    }
}

impl TryFrom<String> for Level {
    type Error = LevelError;

    fn try_from(value: String) -> Result<Self, LevelError> {
        parse_level(&value)
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, LevelError> {
        match value {
            1 => Ok(Level::Trace),
            2 => Ok(Level::Debug),
            3 => Ok(Level::Info),
            4 => Ok(Level::Warn),
            5 => Ok(Level::Error),
            v => Err(LevelError::Unmapped(v)),
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => Level::Trace,
            log::Level::Debug => Level::Debug,
            log::Level::Info => Level::Info,
            log::Level::Warn => Level::Warn,
            log::Level::Error => Level::Error,
        }
    }
}

impl Level {
    /// Most verbose `log` filter that still lets this level through.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Level::Unknown | Level::Trace => log::LevelFilter::Trace,
            Level::Debug => log::LevelFilter::Debug,
            Level::Info => log::LevelFilter::Info,
            Level::Warn => log::LevelFilter::Warn,
            Level::Error => log::LevelFilter::Error,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_level(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order() {
        assert!(Level::Unknown < Level::Trace);
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error.is_error_tier());
        assert!(!Level::Warn.is_error_tier());
    }

    #[test]
    fn test_parse_round_trip() {
        for level in Level::NAMED {
            let name = level_to_string(level).unwrap();
            assert_eq!(parse_level(name).unwrap(), level);
            assert_eq!(Level::try_from(level as u8).unwrap(), level);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse_level("info").unwrap(), Level::Info);
        assert_eq!(parse_level("Warn").unwrap(), Level::Warn);
        assert_eq!("eRrOr".parse::<Level>().unwrap(), Level::Error);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            parse_level("verbose"),
            Err(LevelError::UnknownName("verbose".to_string()))
        );
        assert!(parse_level("").is_err());
        assert!(parse_level("UNKNOWN").is_err());
        assert!(level_to_string(Level::Unknown).is_err());
        assert_eq!(Level::try_from(0u8), Err(LevelError::Unmapped(0)));
        assert_eq!(Level::try_from(6u8), Err(LevelError::Unmapped(6)));
        assert_eq!(Level::try_from("Debug".to_string()), Ok(Level::Debug));
        assert_eq!(
            Level::try_from("loud".to_string()),
            Err(LevelError::UnknownName("loud".to_string()))
        );
    }

    #[test]
    fn test_format_level() {
        assert_eq!(format_level(Level::Info), " INFO");
        assert_eq!(format_level(Level::Warn), " WARN");
        assert_eq!(format_level(Level::Error), "ERROR");
        assert_eq!(format_level(Level::Unknown), "     ");
        for level in Level::NAMED {
            assert_eq!(format_level(level).len(), LEVEL_WIDTH);
        }
    }

    #[test]
    fn test_from_log_level() {
        assert_eq!(Level::from(log::Level::Warn), Level::Warn);
        assert_eq!(Level::Info.to_level_filter(), log::LevelFilter::Info);
    }
}
