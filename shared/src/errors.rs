//! Error types shared between the backend and clients

use thiserror::Error;

/// Errors raised while interpreting stored or submitted domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("Invalid requirement: {0}")]
    InvalidRequirement(String),
}

impl DomainError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        DomainError::UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }
}
