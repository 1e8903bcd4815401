use crate::{models::InboundMessage, AppState};

use axum::{extract::State, http::StatusCode, response::IntoResponse, Form};
use chrono::Utc;
use serde::Deserialize;

#[axum_macros::debug_handler]
pub async fn post_webhook(
    State(state): State<AppState>,
    Form(params): Form<TwilioParams>,
) -> impl IntoResponse {
    log::info!("Received leave request from {}", params.from);
    log::trace!("Leave request body: {}", params.body);

    state.store.push(InboundMessage {
        body: params.body,
        sender: params.from,
        received_at: Utc::now().naive_utc(),
    });

    (StatusCode::OK, "Received")
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct TwilioParams {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub from: String,
}
