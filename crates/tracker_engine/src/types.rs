use std::fmt;

use thiserror::Error;
use tracker_core::{JobId, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    pub kind: FailureKind,
    pub message: String,
}

impl GatewayError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Why a remote call did not produce a usable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// The request body could not be serialized.
    Encode,
    /// The response body was not the expected JSON.
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Encode => write!(f, "request encoding failed"),
            FailureKind::Decode => write!(f, "malformed payload"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("transport failure: {0}")]
    Transport(FailureKind),
    #[error("invalid input: {0}")]
    Validation(ValidationErrors),
    #[error("no job with id {0}")]
    NotFound(JobId),
    #[error("server assigned an id already in use: {0}")]
    DuplicateId(JobId),
}

/// Result of a create/update/delete as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub applied: bool,
    pub reason: Option<ErrorKind>,
}

impl MutationOutcome {
    pub fn success() -> Self {
        Self {
            applied: true,
            reason: None,
        }
    }

    pub fn failure(reason: ErrorKind) -> Self {
        Self {
            applied: false,
            reason: Some(reason),
        }
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match &self.reason {
            Some(ErrorKind::Validation(errors)) => Some(errors),
            _ => None,
        }
    }
}
