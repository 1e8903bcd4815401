mod helpers;

use helpers::{get, get_with_auth, post_with_auth, services};

use chrono::NaiveDate;
use leavedesk::{
    models::InboundMessage,
    store::{MemoryStore, RequestStore},
};
use select::{
    document::Document,
    predicate::{Class, Name, Predicate},
};
use speculoos::prelude::*;
use sqlx::postgres::PgPool;
use std::sync::Arc;

fn store_with_requests() -> Arc<dyn RequestStore> {
    let store = MemoryStore::default();

    for (day, body, sender) in [
        (1, "leave for sister's wedding", "whatsapp:+919123456780"),
        (2, "going home for 2 days", "whatsapp:+919811122233"),
    ] {
        store.push(InboundMessage {
            body: body.to_string(),
            sender: sender.to_string(),
            received_at: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(8, 15, 0)
                .unwrap(),
        });
    }

    Arc::new(store)
}

#[sqlx::test]
async fn test_panel_lists_pending_requests_oldest_first(db: PgPool) {
    let mut services = services(&db);
    services.store = Some(store_with_requests());

    let response = get_with_auth("/", services)
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["content-type"],
        "text/html; charset=utf-8"
    );

    let document = Document::from(response.text().await.unwrap().as_str());

    let requests: Vec<_> = document
        .find(Name("section").and(Class("request")))
        .collect();
    assert_eq!(requests.len(), 2);

    let first = &requests[0];
    assert_that(&first.find(Class("body")).next().unwrap().text())
        .contains("sister's wedding");
    assert_eq!(
        first.find(Class("from")).next().unwrap().text(),
        "whatsapp:+919123456780"
    );

    let first_time = first.find(Name("time")).next().unwrap();
    assert_eq!(first_time.attr("datetime").unwrap(), "2024-03-01T08:15:00");
    assert_that(&first_time.text()).contains("Mar 01, 2024 08:15");

    assert_that(&requests[1].find(Class("body")).next().unwrap().text())
        .contains("going home");

    assert_eq!(document.find(Class("student")).count(), 0);
    assert_eq!(document.find(Class("no-student")).count(), 0);
}

#[sqlx::test]
async fn test_panel_shows_placeholder_without_requests(db: PgPool) {
    let response = get_with_auth("/", services(&db))
        .await
        .expect("Failed to execute request");

    let document = Document::from(response.text().await.unwrap().as_str());

    assert_eq!(document.find(Class("request")).count(), 0);
    assert_that(&document.find(Class("empty")).next().unwrap().text())
        .contains("No pending requests");
}

#[sqlx::test(fixtures("students"))]
async fn test_panel_lookup_shows_student_alongside_requests(db: PgPool) {
    let mut services = services(&db);
    services.store = Some(store_with_requests());

    let response = post_with_auth("/", &[("roll", "CS101")], services)
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let document = Document::from(response.text().await.unwrap().as_str());

    assert_eq!(document.find(Class("request")).count(), 2);

    let student = document
        .find(Name("section").and(Class("student")))
        .next()
        .expect("Expected a student record");

    assert_eq!(student.attr("data-roll").unwrap(), "CS101");
    assert_eq!(student.find(Class("name")).next().unwrap().text(), "A. Kumar");
    assert_eq!(student.find(Class("room")).next().unwrap().text(), "H12");
    assert_eq!(
        student.find(Class("parent-phone")).next().unwrap().text(),
        "+919876543210"
    );

    let decision_form = student
        .find(Name("form").and(Class("decision")))
        .next()
        .expect("Expected a decision form");
    assert_eq!(decision_form.attr("action").unwrap(), "/approve");
}

#[sqlx::test(fixtures("students"))]
async fn test_panel_lookup_of_unknown_roll_shows_no_student_data(db: PgPool) {
    let response = post_with_auth("/", &[("roll", "ME999")], services(&db))
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let document = Document::from(response.text().await.unwrap().as_str());

    assert_eq!(document.find(Class("student")).count(), 0);
    assert_that(&document.find(Class("no-student")).next().unwrap().text())
        .contains("No student data");
}

#[sqlx::test]
async fn test_panel_rejects_without_auth(db: PgPool) {
    let response = get("/", services(&db))
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 401);
    assert_eq!(
        response.headers()["www-authenticate"],
        "Basic realm=\"Please enter your credentials\""
    );
}

#[sqlx::test]
async fn test_panel_stylesheet_is_served(db: PgPool) {
    let response = get("/static/style.css", services(&db))
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_that(&response.headers()["content-type"].to_str().unwrap().to_string())
        .starts_with("text/css");
    assert_that(&response.text().await.unwrap()).contains("font-family");
}
