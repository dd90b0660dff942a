//! Error types for Haze

use thiserror::Error;

/// The main error type for Haze operations
#[derive(Debug, Error)]
pub enum HazeError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Invalid enum value: {value} is not one of {allowed:?}")]
    InvalidEnumValue {
        value: String,
        allowed: Vec<String>,
    },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Lyrics error: {0}")]
    LyricsError(String),
}

/// Result type alias for Haze operations
pub type Result<T> = std::result::Result<T, HazeError>;

impl From<toml::de::Error> for HazeError {
    fn from(err: toml::de::Error) -> Self {
        HazeError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for HazeError {
    fn from(err: toml::ser::Error) -> Self {
        HazeError::TomlSerError(err.to_string())
    }
}
