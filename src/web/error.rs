use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use crate::store::{StoreError, StoreRejection};

use super::types::DataParsingError;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("data parsing error: {0}")]
    DataParsing(#[from] DataParsingError),
    #[error("malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("email is already on the waitlist")]
    DuplicateEmail,
    #[error("store rejected the entry: {0}")]
    StoreRejected(StoreRejection),
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for Error {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Rejected(rejection) if rejection.is_unique_violation() => {
                Error::DuplicateEmail
            }
            StoreError::Rejected(rejection) => Error::StoreRejected(rejection),
            other => Error::Store(other),
        }
    }
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, MethodNotAllowed),
            Error::DataParsing(DataParsingError::MissingRequiredFields) => {
                (StatusCode::BAD_REQUEST, MissingRequiredFields)
            }
            Error::DataParsing(DataParsingError::EmailInvalid) => {
                (StatusCode::BAD_REQUEST, InvalidEmail)
            }
            Error::DuplicateEmail => (StatusCode::CONFLICT, DuplicateEmail),
            Error::StoreRejected(_) => (StatusCode::INTERNAL_SERVER_ERROR, FailedToAdd),
            Error::MalformedBody(_) | Error::Store(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, InternalError)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// The only error messages a client ever gets to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Method not allowed")]
    MethodNotAllowed,
    #[display("Missing required fields: firstName, lastName, email")]
    MissingRequiredFields,
    #[display("Invalid email format")]
    InvalidEmail,
    #[display("Email already exists in waitlist")]
    DuplicateEmail,
    #[display("Failed to add to waitlist")]
    FailedToAdd,
    #[display("Internal server error")]
    InternalError,
}
