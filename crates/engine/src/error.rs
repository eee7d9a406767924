//! Errors the ledger engine can return.
//!
//! Validation errors ([`MissingField`], [`InvalidAmount`], [`InvalidDate`])
//! come from user input or stored records; the remaining variants come from
//! the remote collection.
//!
//!  [`MissingField`]: EngineError::MissingField
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidDate`]: EngineError::InvalidDate
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error("store responded {status}: {message}")]
    Remote { status: u16, message: String },
    #[error("store unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MissingField(a), Self::MissingField(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidConfig(a), Self::InvalidConfig(b)) => a == b,
            (Self::MalformedDocument(a), Self::MalformedDocument(b)) => a == b,
            (
                Self::Remote { status, message },
                Self::Remote {
                    status: other_status,
                    message: other_message,
                },
            ) => status == other_status && message == other_message,
            (Self::Transport(a), Self::Transport(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
