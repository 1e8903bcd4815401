use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;

use crate::phone::normalize;

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Student {
    pub roll: String,
    pub name: String,
    pub department: String,
    pub room: String,
    pub student_phone: String,
    pub parent_phone: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Default, Deserialize)]
pub struct StudentForm {
    #[serde(default)]
    pub roll: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub student_phone: String,
    #[serde(default)]
    pub parent_phone: String,
}

pub async fn find_student(db: &PgPool, roll: &str) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        r#"
            SELECT *
            FROM students
            WHERE roll = $1
        "#,
    )
    .bind(roll)
    .fetch_optional(db)
    .await
}

pub async fn upsert_student(
    db: &PgPool,
    student: &StudentForm,
    now: NaiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO students (roll, name, department, room, student_phone, parent_phone, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ON CONFLICT (roll) DO UPDATE
            SET name = EXCLUDED.name,
                department = EXCLUDED.department,
                room = EXCLUDED.room,
                student_phone = EXCLUDED.student_phone,
                parent_phone = EXCLUDED.parent_phone,
                updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&student.roll)
    .bind(&student.name)
    .bind(&student.department)
    .bind(&student.room)
    .bind(&student.student_phone)
    .bind(&student.parent_phone)
    .bind(now)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn list_students(db: &PgPool) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        r#"
            SELECT *
            FROM students
            ORDER BY roll
        "#,
    )
    .fetch_all(db)
    .await
}

/// A leave request as it arrived from the messaging channel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InboundMessage {
    pub body: String,
    pub sender: String,
    pub received_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "Approved",
            Decision::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one warden decision, written once as an audit row.
#[derive(Clone, Debug, PartialEq)]
pub struct LeaveRecord {
    pub roll: String,
    pub name: String,
    pub department: String,
    pub room: String,
    pub reason: String,
    pub days: String,
    pub start: String,
    pub end: String,
    pub parent_phone: String,
    pub secondary_phone: String,
    pub student_phone: String,
    pub outcome: Decision,
    pub decided_at: NaiveDateTime,
}

impl LeaveRecord {
    /// Normalized numbers to notify, in parent, secondary, student order.
    /// Blank slots are skipped.
    pub fn recipients(&self) -> Vec<String> {
        [
            &self.parent_phone,
            &self.secondary_phone,
            &self.student_phone,
        ]
        .into_iter()
        .filter_map(|number| normalize(number))
        .collect()
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.roll.clone(),
            self.name.clone(),
            self.department.clone(),
            self.room.clone(),
            self.reason.clone(),
            self.days.clone(),
            self.start.clone(),
            self.end.clone(),
            self.parent_phone.clone(),
            self.secondary_phone.clone(),
            self.student_phone.clone(),
            self.outcome.to_string(),
            self.decided_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]
    }
}
