use thiserror::Error;

use crate::mapper::ResourceKind;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failure reported by the injected transport, or a non-success HTTP status.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Error type that captures every failure surfaced by the client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Malformed {kind} resource: {reason}")]
    MalformedResource { kind: ResourceKind, reason: String },
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("{kind} is not attached to a client")]
    Detached { kind: ResourceKind },
}

impl ClientError {
    pub(crate) fn malformed(kind: ResourceKind, reason: impl Into<String>) -> Self {
        ClientError::MalformedResource {
            kind,
            reason: reason.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ClientError::MalformedResource { .. })
    }
}
