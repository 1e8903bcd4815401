use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::google::AuthError;

/// Failures of the upstream services a request depends on.
///
/// None of these are retried: the request fails with a generic server error
/// and the cause is logged.
#[derive(Debug)]
pub enum AppError {
    Database(sqlx::Error),
    Messaging(reqwest::Error),
    Spreadsheet(reqwest::Error),
    SpreadsheetAuth(AuthError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(err) => write!(f, "database error: {}", err),
            AppError::Messaging(err) => write!(f, "messaging error: {}", err),
            AppError::Spreadsheet(err) => write!(f, "spreadsheet error: {}", err),
            AppError::SpreadsheetAuth(err) => write!(f, "spreadsheet authorization error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Database(err) => Some(err),
            AppError::Messaging(err) | AppError::Spreadsheet(err) => Some(err),
            AppError::SpreadsheetAuth(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log::error!("{}", self);

        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        Self::Database(value)
    }
}
