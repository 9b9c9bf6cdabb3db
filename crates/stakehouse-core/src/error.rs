//! Core error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("userId must not be empty")]
    EmptyUserId,

    #[error("sessionkey must not be empty")]
    EmptyToken,

    #[error("unknown session token")]
    UnknownToken,

    #[error("session token expired")]
    ExpiredToken,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("offerId must not be empty")]
    EmptyOfferId,

    #[error("userId must not be empty")]
    EmptyUserId,
}
