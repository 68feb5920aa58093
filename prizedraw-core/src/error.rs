use thiserror::Error;

pub type Result<T> = std::result::Result<T, PrizeError>;

#[derive(Error, Debug)]
pub enum PrizeError {
    #[error("Listing format error: {0}")]
    Format(String),

    #[error("Prize not found: {name}")]
    NotFound { name: String },

    #[error("Prize already depleted: {name}")]
    Depleted { name: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PrizeError {
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn depleted(name: impl Into<String>) -> Self {
        Self::Depleted { name: name.into() }
    }
}

/// A single malformed listing row. Collected during a load, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("row {row}: {kind}")]
pub struct RowError {
    pub row: usize,
    pub kind: RowErrorKind,
}

impl RowError {
    pub fn new(row: usize, kind: RowErrorKind) -> Self {
        Self { row, kind }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowErrorKind {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("prize name cannot be empty")]
    EmptyName,

    #[error("quantity '{0}' is not an integer")]
    NotInteger(String),

    #[error("quantity cannot be negative ({0})")]
    Negative(String),

    #[error("quantity '{0}' is too large")]
    TooLarge(String),
}
