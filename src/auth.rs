use crate::AppState;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose, Engine as _};
use http::header;
use std::str::from_utf8;

// Adapted from https://www.shuttle.rs/blog/2023/09/27/rust-vs-go-comparison#middleware-1

/// The warden, authenticated with HTTP basic auth against the `AUTH` setting.
pub struct User;

#[async_trait]
impl FromRequestParts<AppState> for User {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let credentials = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix("Basic "))
            .and_then(|encoded| general_purpose::STANDARD.decode(encoded).ok());

        if let Some(decoded) = credentials {
            if from_utf8(&decoded).unwrap_or("") == state.config.auth {
                return Ok(User);
            }
        }

        log::warn!("Rejected unauthenticated request to {}", parts.uri.path());

        Err((
            StatusCode::UNAUTHORIZED,
            [(
                header::WWW_AUTHENTICATE,
                "Basic realm=\"Please enter your credentials\"",
            )],
            "Unauthorized",
        )
            .into_response())
    }
}
