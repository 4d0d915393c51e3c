//! Fatal pipeline errors.
//!
//! Only malformed input and unusable configuration end up here. Layout
//! problems found after generation are reported as [`crate::qc::Finding`]s
//! and never abort a run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("structured program could not be parsed: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("room requirement '{name}' is invalid: {reason}")]
    InvalidRequirement { name: String, reason: String },

    #[error("design constraints are invalid: {}", .0.join("; "))]
    InvalidConstraints(Vec<String>),

    #[error("program contains no rooms after expansion")]
    EmptyProgram,

    #[error("invalid drawing scale '{0}', expected N:M with positive integers")]
    InvalidScale(String),

    #[error("unknown paper size '{0}'")]
    UnknownPaperSize(String),

    #[error("unknown export format '{0}'")]
    UnknownFormat(String),

    #[error("invalid generation config: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),
}

pub type Result<T> = std::result::Result<T, DraftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_joined() {
        let err = DraftError::InvalidConfig(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "invalid generation config: a; b");
    }

    #[test]
    fn json_errors_convert() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: DraftError = bad.into();
        assert!(matches!(err, DraftError::InvalidPayload(_)));
    }
}
