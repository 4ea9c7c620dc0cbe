//! Error types for ClauDent
//!
//! The search core itself never fails; these cover the edges of the shell:
//! loading the patient index, reading configuration and driving the terminal.

use thiserror::Error;

/// Main error type for ClauDent operations
#[derive(Error, Debug)]
pub enum ClaudentError {
    #[error("Failed to read patient index '{0}': {1}")]
    PatientIndexRead(String, std::io::Error),

    #[error("Invalid patient index '{0}': {1}")]
    PatientIndexParse(String, serde_json::Error),

    #[error("Duplicate patient identifier '{0}' in index")]
    DuplicatePatientId(String),

    #[error("Invalid patient record: {0}")]
    InvalidPatientRecord(String),

    #[error("No patient index configured (use --patients or set patients_file)")]
    NoPatientIndex,

    #[error("Failed to read configuration '{0}': {1}")]
    ConfigRead(String, std::io::Error),

    #[error("Invalid configuration file '{0}': {1}")]
    ConfigParse(String, toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not determine the user's home directory")]
    MissingHomeDir,

    #[error("Failed to initialise logging: {0}")]
    Logging(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for ClauDent operations
pub type Result<T> = std::result::Result<T, ClaudentError>;

impl ClaudentError {
    /// Check if this error leaves the running shell usable.
    ///
    /// A background index reload that fails keeps the previous index, so
    /// index errors are recoverable once the shell is up.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClaudentError::PatientIndexRead(_, _)
                | ClaudentError::PatientIndexParse(_, _)
                | ClaudentError::DuplicatePatientId(_)
                | ClaudentError::InvalidPatientRecord(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_errors_are_recoverable() {
        let err = ClaudentError::DuplicatePatientId("7".into());
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Duplicate patient identifier '7' in index");
    }

    #[test]
    fn config_errors_are_fatal() {
        assert!(!ClaudentError::InvalidConfig("tick_rate_ms must be > 0".into()).is_recoverable());
        assert!(!ClaudentError::MissingHomeDir.is_recoverable());
    }
}
