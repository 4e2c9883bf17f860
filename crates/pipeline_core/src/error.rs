use thiserror::Error;

use crate::contract::{respond, LambdaResponse};

/// Failure reported by a storage collaborator (object store or table).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The managed service received the call and rejected it.
    #[error("{0}")]
    Service(String),
    /// The call never produced a service verdict: transport, timeout,
    /// request construction or local I/O.
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("{0}")]
    ClientError(String),
    #[error("ClientError: {0}")]
    StoreError(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Error: {0}")]
    UnexpectedError(String),
}

impl HandlerError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ClientError(_) => 400,
            Self::NotFound(_) => 404,
            Self::StoreError(_) | Self::UnexpectedError(_) => 500,
        }
    }

    pub fn into_response(self) -> LambdaResponse {
        respond(self.status_code(), self.to_string())
    }
}

impl From<StoreError> for HandlerError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Service(message) => Self::StoreError(message),
            StoreError::Other(message) => Self::UnexpectedError(message),
        }
    }
}
