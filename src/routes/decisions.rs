use crate::{
    auth::User,
    error::AppError,
    models::{find_student, Decision, LeaveRecord, Student},
    AppState,
};

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::{NaiveDateTime, Utc};
use indoc::formatdoc;
use serde::Deserialize;

pub const STUDENT_NOT_FOUND: &str = "Student not found";

#[axum_macros::debug_handler]
pub async fn post_approve(
    State(state): State<AppState>,
    _user: User,
    Form(form): Form<DecisionForm>,
) -> Result<Response, AppError> {
    let roll = form.roll.trim();

    let Some(student) = find_student(&state.db, roll).await? else {
        log::warn!("Decision submitted for unknown roll {}", roll);
        return Ok(STUDENT_NOT_FOUND.into_response());
    };

    let record = form.into_record(student, Utc::now().naive_utc());
    let message = compose_decision_message(&record);

    log::info!("Leave {} for {}", record.outcome, record.roll);

    if record.outcome == Decision::Approved {
        for number in record.recipients() {
            state.twilio.send_message(&number, &message).await?;
        }
    }

    state.sheets.append_row(&record.to_row()).await?;

    Ok(Redirect::to("/").into_response())
}

pub fn compose_decision_message(record: &LeaveRecord) -> String {
    formatdoc! {"
        LEAVE {outcome}

        Student: {name}
        Roll No: {roll}
        Department: {department}
        Room: {room}
        Reason: {reason}
        Days: {days}
        Start Date: {start}
        End Date: {end}

        By Warden",
        outcome = record.outcome.as_str().to_uppercase(),
        name = record.name,
        roll = record.roll,
        department = record.department,
        room = record.room,
        reason = record.reason,
        days = record.days,
        start = record.start,
        end = record.end,
    }
}

#[derive(Deserialize, Debug)]
pub struct DecisionForm {
    #[serde(default)]
    pub roll: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub days: String,
    #[serde(default)]
    pub secondary: String,
    pub action: Decision,
}

impl DecisionForm {
    fn into_record(self, student: Student, decided_at: NaiveDateTime) -> LeaveRecord {
        LeaveRecord {
            roll: student.roll,
            name: student.name,
            department: student.department,
            room: student.room,
            reason: self.reason,
            days: self.days,
            start: self.start,
            end: self.end,
            parent_phone: student.parent_phone,
            secondary_phone: self.secondary,
            student_phone: student.student_phone,
            outcome: self.action,
            decided_at,
        }
    }
}
