use axum::response::{IntoResponse, Response};
use stakehouse_core::{LedgerError, SessionError};
use thiserror::Error;

use crate::response::Envelope;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("invalid sessionkey")]
    InvalidSession(#[source] SessionError),

    #[error("wrong request method")]
    MethodNotAllowed,

    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ApiError {
    pub fn missing(field: &str) -> Self {
        ApiError::BadRequest(format!("{field} must not be empty"))
    }

    pub fn invalid(field: &str) -> Self {
        ApiError::BadRequest(format!("invalid {field}"))
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::EmptyUserId | SessionError::EmptyToken => {
                ApiError::BadRequest(err.to_string())
            }
            SessionError::UnknownToken | SessionError::ExpiredToken => {
                ApiError::InvalidSession(err)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::InvalidSession(source) => {
                tracing::warn!("Rejected session: {}", source);
            }
            other => {
                tracing::warn!("Bad request: {}", other);
            }
        }
        Envelope::failure(self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_errors_map_to_messages() {
        assert_eq!(
            ApiError::from(SessionError::EmptyToken).to_string(),
            "sessionkey must not be empty"
        );
        assert_eq!(
            ApiError::from(SessionError::UnknownToken).to_string(),
            "invalid sessionkey"
        );
        assert_eq!(
            ApiError::from(SessionError::ExpiredToken).to_string(),
            "invalid sessionkey"
        );
        assert_eq!(
            ApiError::from(LedgerError::EmptyOfferId).to_string(),
            "offerId must not be empty"
        );
    }
}
