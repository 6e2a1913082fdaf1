use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    AuthRejected,
    TransportFailure,
    CategoryExhausted,
    ValidationRejected,
}

/// Every failure a presenter session can observe. None of them is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{0}")]
    AuthRejected(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("no questions remaining for category {0}")]
    CategoryExhausted(String),
    #[error("{0}")]
    Validation(String),
}

impl GameError {
    pub fn auth(message: impl Into<String>) -> Self {
        Self::AuthRejected(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthRejected(_) => ErrorKind::AuthRejected,
            Self::Transport(_) => ErrorKind::TransportFailure,
            Self::CategoryExhausted(_) => ErrorKind::CategoryExhausted,
            Self::Validation(_) => ErrorKind::ValidationRejected,
        }
    }
}

/// A user-visible message left behind by a failed or rejected transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: ErrorKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(GameError::auth("nope").kind(), ErrorKind::AuthRejected);
        assert_eq!(
            GameError::CategoryExhausted("History".into()).kind(),
            ErrorKind::CategoryExhausted
        );
        assert_eq!(
            GameError::validation("Please type an answer.").to_string(),
            "Please type an answer."
        );
    }

    #[test]
    fn error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::TransportFailure).expect("json");
        assert_eq!(json, "\"transport_failure\"");
    }
}
