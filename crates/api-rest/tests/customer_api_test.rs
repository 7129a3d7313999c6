//! HTTP tests for the intake router.
//!
//! Each test builds the router over a fresh temporary data directory and drives it with
//! `oneshot`, so no socket is bound.

use api_rest::{create_router, AppState};
use api_shared::CreateCustomerReq;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::FixedOffset;
use http_body_util::BodyExt;
use intake_core::CoreConfig;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

fn app(temp_dir: &TempDir) -> Router {
    let cfg = CoreConfig::new(
        temp_dir.path().to_path_buf(),
        FixedOffset::west_opt(8 * 3600).expect("valid offset"),
    )
    .expect("valid config");
    create_router(AppState::from_config(&cfg), CorsLayer::permissive())
}

fn john_doe() -> CreateCustomerReq {
    CreateCustomerReq {
        first_name: "John".into(),
        last_name: "Doe".into(),
        email: "john@example.com".into(),
        phone_number: "555-0100".into(),
        address: "1 Main St".into(),
        service_date: "2024-01-15T10:00:00Z".into(),
        quote_amount: 150.0,
        service_details: "Window cleaning".into(),
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.expect("failed to make request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read response body")
        .to_bytes();
    (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn create(app: Router, body: String) -> (StatusCode, Value) {
    let (status, body) = send(app, post_json("/customer/create", body)).await;
    (status, serde_json::from_str(&body).expect("JSON body"))
}

#[tokio::test]
async fn root_and_health_respond() {
    let temp_dir = TempDir::new().unwrap();

    let (status, body) = send(app(&temp_dir), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["message"], "Welcome to the Customer Intake API");

    let (status, body) = send(app(&temp_dir), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn create_then_read_back_verbatim() {
    let temp_dir = TempDir::new().unwrap();
    let body = serde_json::to_string(&john_doe()).unwrap();

    let (status, created) = create(app(&temp_dir), body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Customer created successfully");
    let client_id = created["client_id"].as_str().expect("client_id").to_string();
    assert_eq!(client_id.len(), 32);

    let response = app(&temp_dir)
        .oneshot(get(&format!("/customer/{client_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let served = response.into_body().collect().await.unwrap().to_bytes();

    let path = temp_dir
        .path()
        .join("customers")
        .join(&client_id[0..2])
        .join(&client_id[2..4])
        .join(&client_id)
        .join("customer_data.json");
    let on_disk = std::fs::read(path).expect("record on disk");
    assert_eq!(served.to_vec(), on_disk);

    let record: Value = serde_json::from_slice(&on_disk).unwrap();
    assert_eq!(record["follow_up_date"], "2024-04-15T10:00:00Z");
    assert_eq!(record["client_id"], client_id);
}

#[tokio::test]
async fn month_end_service_date_clamps_follow_up() {
    let temp_dir = TempDir::new().unwrap();
    let mut req = john_doe();
    req.service_date = "2024-01-31T10:00:00Z".into();

    let (status, created) = create(app(&temp_dir), serde_json::to_string(&req).unwrap()).await;
    assert_eq!(status, StatusCode::CREATED);

    let client_id = created["client_id"].as_str().unwrap();
    let (_, document) = send(app(&temp_dir), get(&format!("/customer/{client_id}"))).await;
    let record: Value = serde_json::from_str(&document).unwrap();
    assert_eq!(record["follow_up_date"], "2024-04-30T10:00:00Z");
}

#[tokio::test]
async fn missing_email_is_a_field_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut body = serde_json::to_value(john_doe()).unwrap();
    body.as_object_mut().unwrap().remove("email");

    let (status, error) = create(app(&temp_dir), body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["fields"][0]["field"], "email");
    assert!(!temp_dir.path().join("customers").exists());
}

#[tokio::test]
async fn negative_quote_is_a_field_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut req = john_doe();
    req.quote_amount = -10.0;

    let (status, error) = create(app(&temp_dir), serde_json::to_string(&req).unwrap()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = error["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["quote_amount"]);
}

#[tokio::test]
async fn malformed_body_is_reported_against_body() {
    let temp_dir = TempDir::new().unwrap();

    let (status, error) = create(app(&temp_dir), "not json".into()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["fields"][0]["field"], "body");
}

#[tokio::test]
async fn unwritable_storage_is_an_opaque_500() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("customers"), "in the way").unwrap();

    let (status, error) = create(
        app(&temp_dir),
        serde_json::to_string(&john_doe()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error, json!({"message": "Internal error"}));
}

#[tokio::test]
async fn customer_lookup_errors() {
    let temp_dir = TempDir::new().unwrap();

    let (status, _) = send(app(&temp_dir), get("/customer/not-a-client-id")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        app(&temp_dir),
        get("/customer/0123456789abcdef0123456789abcdef"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["message"], "Customer not found");
}

#[tokio::test]
async fn jobs_list_newest_first() {
    let temp_dir = TempDir::new().unwrap();
    for date in ["2023-05-01T09:00:00Z", "2024-02-01T09:00:00Z"] {
        let mut req = john_doe();
        req.service_date = date.into();
        let (status, _) = create(app(&temp_dir), serde_json::to_string(&req).unwrap()).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(app(&temp_dir), get("/jobs")).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["last_service_date"], "2024-02-01T09:00:00Z");
    assert_eq!(jobs[0]["full_name"], "John Doe");
}

#[tokio::test]
async fn book_and_list_appointments() {
    let temp_dir = TempDir::new().unwrap();
    let contact = "550e8400e29b41d4a716446655440000";
    let booking = json!({
        "contact_id": contact,
        "start_time_iso": "2099-03-02T10:00:00-08:00"
    });

    let (status, body) = send(
        app(&temp_dir),
        post_json("/appointments/book", booking.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body.contains(contact));

    let (status, body) = send(
        app(&temp_dir),
        post_json("/appointments/book", booking.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["message"], "The requested time slot is not available.");

    let (status, body) = send(app(&temp_dir), get("/appointments/2099-03-02")).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["date"], "2099-03-02");
    assert_eq!(body["appointments"][0]["contact_id"], contact);
    assert_eq!(
        body["appointments"][0]["start_time"],
        "2099-03-02T10:00:00-08:00"
    );

    let (status, body) = send(app(&temp_dir), get("/appointments/available/2099-03-02")).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    let slots = body["available_slots"].as_array().unwrap();
    assert_eq!(slots.len(), 13);
    assert!(!slots.contains(&json!("2099-03-02T10:00:00-08:00")));
}

#[tokio::test]
async fn booking_rejections_are_conflicts() {
    let temp_dir = TempDir::new().unwrap();
    let contact = "550e8400e29b41d4a716446655440000";

    for (start, message) in [
        ("2099-03-02T10:30:00-08:00", "Appointments can only be booked on the hour."),
        ("2099-03-02T22:00:00-08:00", "The requested time is outside of business hours."),
        ("2001-03-02T10:00:00-08:00", "Cannot book appointments in the past."),
        ("soon", "Invalid ISO date format provided."),
    ] {
        let booking = json!({"contact_id": contact, "start_time_iso": start});
        let (status, body) = send(
            app(&temp_dir),
            post_json("/appointments/book", booking.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT, "{start}");
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["message"], message);
    }

    let booking = json!({"contact_id": "nobody", "start_time_iso": "2099-03-02T10:00:00-08:00"});
    let (status, _) = send(
        app(&temp_dir),
        post_json("/appointments/book", booking.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_booking_body_is_a_field_error() {
    let temp_dir = TempDir::new().unwrap();

    let wrong_type = json!({"contact_id": 7, "start_time_iso": "2099-03-02T10:00:00-08:00"});
    for (body, field) in [
        ("not json".to_string(), "body"),
        (wrong_type.to_string(), "contact_id"),
    ] {
        let (status, error) = send(app(&temp_dir), post_json("/appointments/book", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: Value = serde_json::from_str(&error).unwrap();
        assert_eq!(error["fields"][0]["field"], field, "{error}");
    }
}

#[tokio::test]
async fn availability_input_errors() {
    let temp_dir = TempDir::new().unwrap();

    let (status, _) = send(app(&temp_dir), get("/appointments/2024-13-40")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(app(&temp_dir), get("/appointments/available/yesterday")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for days in ["0", "61", "many"] {
        let (status, _) = send(
            app(&temp_dir),
            get(&format!("/appointments/available/bulk/{days}")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "days={days}");
    }

    let (status, body) = send(app(&temp_dir), get("/appointments/available/bulk/3")).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body.as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let temp_dir = TempDir::new().unwrap();

    let (status, body) = send(app(&temp_dir), get("/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    let doc: Value = serde_json::from_str(&body).unwrap();
    assert!(doc["paths"]["/customer/create"].is_object());
}
