use thiserror::Error;

use crate::transport::TransportError;

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// A required article field that was empty after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title must not be empty or consist only of whitespace.")]
    EmptyTitle,
    #[error("Short description must not be empty or consist only of whitespace.")]
    EmptyDescription,
    #[error("Article text must not be empty or consist only of whitespace.")]
    EmptyBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("you must be signed in to do that")]
    Unauthenticated,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Network(String),
}

impl ClientError {
    /// Maps a transport rejection, using `fallback` when the server sent no message.
    pub fn from_transport(err: TransportError, fallback: &str) -> Self {
        let unauthorized = err.is_unauthorized();
        let message = err.message_or(fallback);
        if unauthorized {
            Self::Unauthorized(message)
        } else {
            Self::Network(message)
        }
    }
}
