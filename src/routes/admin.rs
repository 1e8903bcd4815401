use crate::{
    auth::User,
    error::AppError,
    models::{list_students, upsert_student, Student, StudentForm},
    AppState,
};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use axum_template::RenderHtml;
use chrono::Utc;
use serde::Serialize;

pub async fn get_students(
    State(state): State<AppState>,
    _user: User,
) -> Result<impl IntoResponse, AppError> {
    let students = list_students(&state.db).await?;

    Ok(RenderHtml(
        "admin/students",
        state.engine,
        StudentsTemplate { students },
    ))
}

pub async fn post_student(
    State(state): State<AppState>,
    _user: User,
    Form(mut form): Form<StudentForm>,
) -> Result<Response, AppError> {
    form.roll = form.roll.trim().to_string();

    if form.roll.is_empty() {
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, "Roll number is required").into_response());
    }

    upsert_student(&state.db, &form, Utc::now().naive_utc()).await?;

    log::info!("Saved student {}", form.roll);

    Ok("Student saved".into_response())
}

#[derive(Serialize)]
struct StudentsTemplate {
    students: Vec<Student>,
}
