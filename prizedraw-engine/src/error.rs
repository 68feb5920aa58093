use prizedraw_core::PrizeError;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] PrizeError),

    #[error("All prizes have been drawn")]
    EmptyPool,

    #[error("Invalid engine state: {0}")]
    InvalidState(String),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),
}

impl EngineError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }
}
