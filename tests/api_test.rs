mod common;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::setup_test_db;
use timetable::api::router;
use timetable::state::AppState;

async fn app() -> Router {
    let pool = setup_test_db().await;
    router(AppState { db: pool })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

fn id_of(body: &str) -> String {
    let value: Value = serde_json::from_str(body).expect("Body is not JSON");
    value["id"].as_str().expect("Missing id").to_string()
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, _) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_timetable_flow_over_http() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/rooms",
        Some(json!({"room_name": "Room 101", "capacity": 40, "building": "Main", "floor": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let room_id = id_of(&body);

    let (status, body) = send(
        &app,
        "POST",
        "/schedule-groups",
        Some(json!({
            "school_year": "2026-2027",
            "semester": "1st Semester",
            "department": "CS",
            "education_level": "College",
            "year_level": "2nd Year"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let group_id = id_of(&body);

    let entries = [
        ("CS201", "2nd Year", "A"),
        ("CS102", "1st Year", "B"),
        ("CS101", "1st Year", "A"),
    ];
    for (subject, year, block) in entries {
        let (status, _) = send(
            &app,
            "POST",
            &format!("/schedule-groups/{}/entries", group_id),
            Some(json!({
                "subject_code": subject,
                "subject_description": "Lecture",
                "year_level": year,
                "block": block,
                "units": 3,
                "department": "CS",
                "meetings": [{"day": "Mon", "start_time": "09:00", "end_time": "11:00"}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let timetable_uri = format!("/schedule-groups/{}/timetable", group_id);
    let (status, body) = send(&app, "GET", &timetable_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let first = body.find("\"1st Year A\"").unwrap();
    let second = body.find("\"1st Year B\"").unwrap();
    let third = body.find("\"2nd Year A\"").unwrap();
    assert!(first < second && second < third);

    let (status, body) = send(
        &app,
        "GET",
        "/rooms/available?day=Mon&start_time=11:00&end_time=12:00",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&room_id));

    let export_uri = format!("/schedule-groups/{}/timetable/export", group_id);
    let (status, text) = send(&app, "GET", &export_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("== 2nd Year A =="));
}

#[tokio::test]
async fn test_error_statuses() {
    let app = app().await;

    let (status, _) = send(&app, "GET", "/schedule-groups/missing/timetable", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "GET",
        "/rooms/available?day=Mon&start_time=10:00&end_time=09:00",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("end_time"));

    let (status, _) = send(&app, "POST", "/drafts/missing/approve", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_draft_lifecycle_over_http() {
    let app = app().await;

    let (_, body) = send(
        &app,
        "POST",
        "/schedule-groups",
        Some(json!({
            "school_year": "2026-2027",
            "semester": "2nd Semester",
            "department": "IT",
            "education_level": "College",
            "year_level": "1st"
        })),
    )
    .await;
    let group_id = id_of(&body);

    let uri = format!("/schedule-groups/{}/draft", group_id);
    let (status, body) = send(&app, "POST", &uri, Some(json!({"draft_name": "review"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let draft_id = id_of(&body);

    let (status, _) = send(&app, "POST", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "POST", &format!("/drafts/{}/reject", draft_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let transition: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(transition["state"], "NoDraft");
    assert_eq!(transition["action"], "reject");

    let timetable_uri = format!("/schedule-groups/{}/timetable", group_id);
    let (status, _) = send(&app, "GET", &timetable_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
