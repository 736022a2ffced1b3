//! # Datapoint Errors
//!
//! Domain error type and its HTTP mapping. Every handler returns
//! `DatapointResult`, so this is the one place errors become responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::auth::AuthError;
use crate::store::StoreError;

/// Result type for datapoint operations
pub type DatapointResult<T> = Result<T, DatapointError>;

/// Where an invalid input value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Body,
    Query,
    Params,
}

/// One rejected input field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub location: Location,
    pub messages: Vec<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, location: Location, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            location,
            messages: vec![message.into()],
        }
    }
}

/// Datapoint API errors
#[derive(Debug, Error)]
pub enum DatapointError {
    /// Input rejected before any store access
    #[error("Validation Error")]
    Validation(Vec<FieldError>),

    /// Identifier does not resolve to a record
    #[error("Datapoint does not exist")]
    NotFound,

    /// A unique index rejected the write
    #[error("Validation Error")]
    Conflict(FieldError),

    /// Authentication or authorization failed
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Any other store failure, passed through unchanged
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl DatapointError {
    /// Single-field validation failure
    pub fn invalid(field: impl Into<String>, location: Location, message: impl Into<String>) -> Self {
        DatapointError::Validation(vec![FieldError::new(field, location, message)])
    }

    /// Turn a uniqueness violation into `Conflict`; anything else passes through
    pub fn check_duplicate_key(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { field, .. } => {
                let message = format!("\"{}\" already exists", field);
                DatapointError::Conflict(FieldError::new(field, Location::Body, message))
            }
            other => DatapointError::Store(other),
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DatapointError::Validation(_) => StatusCode::BAD_REQUEST,
            DatapointError::NotFound => StatusCode::NOT_FOUND,
            DatapointError::Conflict(_) => StatusCode::CONFLICT,
            DatapointError::Auth(auth_err) => auth_err.status_code(),
            DatapointError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn field_errors(&self) -> Vec<FieldError> {
        match self {
            DatapointError::Validation(errors) => errors.clone(),
            DatapointError::Conflict(error) => vec![error.clone()],
            _ => Vec::new(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl From<&DatapointError> for ErrorResponse {
    fn from(err: &DatapointError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            message: err.to_string(),
            errors: err.field_errors(),
        }
    }
}

impl IntoResponse for DatapointError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
