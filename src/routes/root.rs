use crate::{
    auth::User,
    error::AppError,
    models::{find_student, Student},
    AppState,
};

use axum::{extract::State, response::IntoResponse, Form};
use axum_template::RenderHtml;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};

pub async fn get_panel(State(state): State<AppState>, _user: User) -> impl IntoResponse {
    render_panel(state, None)
}

pub async fn post_panel(
    State(state): State<AppState>,
    _user: User,
    Form(params): Form<LookupParams>,
) -> Result<impl IntoResponse, AppError> {
    let student = match params.roll.as_deref().map(str::trim) {
        Some(roll) if !roll.is_empty() => find_student(&state.db, roll).await?,
        _ => None,
    };

    if student.is_none() {
        log::debug!("No student data for roll {:?}", params.roll);
    }

    Ok(render_panel(state, Some(StudentLookup { student })))
}

fn render_panel(state: AppState, lookup: Option<StudentLookup>) -> impl IntoResponse {
    let requests = state
        .store
        .pending()
        .into_iter()
        .map(|message| PendingRequest {
            body: message.body,
            sender: message.sender,
            received_at: message.received_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            formatted_received_at: message.received_at.format("%b %d, %Y %H:%M").to_string(),
        })
        .collect();

    RenderHtml("warden", state.engine, PanelTemplate { requests, lookup })
}

#[serde_as]
#[derive(Deserialize, Debug)]
pub struct LookupParams {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub roll: Option<String>,
}

#[derive(Serialize)]
struct PanelTemplate {
    requests: Vec<PendingRequest>,
    lookup: Option<StudentLookup>,
}

#[derive(Serialize)]
struct PendingRequest {
    body: String,
    sender: String,
    received_at: String,
    formatted_received_at: String,
}

#[derive(Serialize)]
struct StudentLookup {
    student: Option<Student>,
}
