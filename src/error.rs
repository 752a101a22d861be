use std::path::PathBuf;
use thiserror::Error;

use crate::types::ConfigType;

#[derive(Debug, Error)]
pub enum ConfigVarError {
    #[error("Type mismatch for '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: ConfigType,
        found: String,
    },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] confique::Error),

    #[error("No configuration source: call .source() on the builder")]
    SourceRequired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_formats_correctly() {
        let err = ConfigVarError::TypeMismatch {
            key: "database.pool_size".into(),
            expected: ConfigType::Int,
            found: "string".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("database.pool_size"));
        assert!(msg.contains("int"));
        assert!(msg.contains("string"));
    }

    #[test]
    fn invalid_value_formats() {
        let err = ConfigVarError::InvalidValue {
            key: "mode".into(),
            reason: "unknown variant".into(),
        };
        assert_eq!(err.to_string(), "Invalid value for 'mode': unknown variant");
    }

    #[test]
    fn source_required_formats() {
        let err = ConfigVarError::SourceRequired;
        assert!(err.to_string().contains(".source()"));
    }
}
