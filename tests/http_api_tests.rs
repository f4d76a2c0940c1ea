use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use dignitary_tracker::{
    RecordStore,
    image::PortraitSink,
    storage::InMemoryBlobStore,
    web::{AppState, ROLE_HEADER, build_router},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const PNG: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
];

fn app_with(portraits: PortraitSink) -> axum::Router {
    build_router(AppState::new(Arc::new(RecordStore::in_memory()), portraits))
}

fn app() -> axum::Router {
    app_with(PortraitSink::Inline)
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("response expected");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    (status, body.to_vec())
}

fn as_json(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body).expect("body should be valid JSON")
}

async fn send_json(
    app: &axum::Router,
    method: Method,
    uri: &str,
    role: &str,
    payload: Value,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header(ROLE_HEADER, role)
        .body(Body::from(payload.to_string()))
        .expect("request should build");
    let (status, body) = send(app, request).await;
    (status, as_json(&body))
}

async fn send_empty(app: &axum::Router, method: Method, uri: &str, role: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(ROLE_HEADER, role)
        .body(Body::empty())
        .expect("request should build");
    let (status, body) = send(app, request).await;
    (status, as_json(&body))
}

async fn create(app: &axum::Router, name: &str, designation: &str, status: &str) -> String {
    let (code, body) = send_json(
        app,
        Method::POST,
        "/api/v1/dignitaries",
        "admin",
        json!({
            "name": name,
            "designation": designation,
            "organization": "Summit Delegation",
            "status": status
        }),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED);
    body["data"]["id"]
        .as_str()
        .expect("created response should have id")
        .to_string()
}

#[tokio::test]
async fn create_and_get_dignitary() {
    let app = app();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/dignitaries",
        "admin",
        json!({
            "name": "Jane Doe",
            "designation": "Foreign Minister",
            "organization": "Exampleland",
            "remarks": "Arriving with 3 aides",
            "carNumber": "DL 01 AB 1234",
            "loName": "Ravi Kumar"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "Not Started");
    assert_eq!(body["data"]["liaisonName"], "Ravi Kumar");
    let id = body["data"]["id"].as_str().expect("id");

    let (status, fetched) =
        send_empty(&app, Method::GET, &format!("/api/v1/dignitaries/{id}"), "lo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["carNumber"], "DL 01 AB 1234");
}

#[tokio::test]
async fn create_rejects_blank_required_field() {
    let app = app();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/dignitaries",
        "admin",
        json!({ "name": "  ", "designation": "Ambassador", "organization": "UN" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn list_orders_by_priority_and_filters() {
    let app = app();
    create(&app, "Maria Garcia", "Secretary of State", "Reached").await;
    create(&app, "John Smith", "Ambassador", "Reaching in 5 min").await;
    create(&app, "Jane Doe", "Foreign Minister", "Not Started").await;

    let (status, page) = send_empty(&app, Method::GET, "/api/v1/dignitaries", "lo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"]["total"], 3);
    let names: Vec<&str> = page["data"]["items"]
        .as_array()
        .expect("items should be array")
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["John Smith", "Jane Doe", "Maria Garcia"]);

    let (_, page) = send_empty(&app, Method::GET, "/api/v1/dignitaries?search=AMB", "lo").await;
    assert_eq!(page["data"]["visible"], 1);
    assert_eq!(page["data"]["items"][0]["name"], "John Smith");
}

#[tokio::test]
async fn liaison_officer_cannot_manage_records() {
    let app = app();
    let id = create(&app, "Jane Doe", "Foreign Minister", "Started").await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/dignitaries",
        "lo",
        json!({ "name": "X", "designation": "Y", "organization": "Z" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "permission_denied");

    let (status, _) =
        send_empty(&app, Method::DELETE, &format!("/api/v1/dignitaries/{id}"), "lo").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_empty(&app, Method::GET, &format!("/api/v1/dignitaries/{id}"), "lo").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_role_is_bad_request() {
    let app = app();
    let (status, body) = send_empty(&app, Method::GET, "/api/v1/dignitaries", "guest").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "input_error");
}

#[tokio::test]
async fn inline_edit_updates_status_and_remarks_only() {
    let app = app();
    let id = create(&app, "Jane Doe", "Foreign Minister", "Started").await;

    let (status, body) = send_json(
        &app,
        Method::PATCH,
        &format!("/api/v1/dignitaries/{id}/inline"),
        "lo",
        json!({ "status": "reaching_in_10_min", "remarks": "Stuck at gate 2" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Reaching in 10 min");
    assert_eq!(body["data"]["remarks"], "Stuck at gate 2");
    assert_eq!(body["data"]["designation"], "Foreign Minister");
}

#[tokio::test]
async fn inline_edit_without_remarks_keeps_stored_remarks() {
    let app = app();
    let id = create(&app, "Jane Doe", "Foreign Minister", "Started").await;
    let uri = format!("/api/v1/dignitaries/{id}/inline");

    let (_, body) = send_json(
        &app,
        Method::PATCH,
        &uri,
        "lo",
        json!({ "status": "Started", "remarks": "Gate 4 VIP" }),
    )
    .await;
    assert_eq!(body["data"]["remarks"], "Gate 4 VIP");

    let (status, body) =
        send_json(&app, Method::PATCH, &uri, "lo", json!({ "status": "Reached" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Reached");
    assert_eq!(body["data"]["remarks"], "Gate 4 VIP");

    let (status, body) = send_json(
        &app,
        Method::PATCH,
        &uri,
        "lo",
        json!({ "status": "Reached", "remarks": null }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["remarks"], Value::Null);
}

#[tokio::test]
async fn patch_merges_supplied_fields() {
    let app = app();
    let id = create(&app, "Jane Doe", "Foreign Minister", "Started").await;

    let (status, body) = send_json(
        &app,
        Method::PATCH,
        &format!("/api/v1/dignitaries/{id}"),
        "admin",
        json!({ "carNumber": "CAR-7" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["carNumber"], "CAR-7");
    assert_eq!(body["data"]["status"], "Started");

    let (status, _) = send_json(
        &app,
        Method::PATCH,
        &format!("/api/v1/dignitaries/{id}"),
        "admin",
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_then_get_returns_not_found() {
    let app = app();
    let id = create(&app, "Jane Doe", "Foreign Minister", "Started").await;
    let uri = format!("/api/v1/dignitaries/{id}");

    let (status, body) = send_empty(&app, Method::DELETE, &uri, "admin").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send_empty(&app, Method::GET, &uri, "admin").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (status, _) = send_empty(&app, Method::DELETE, &uri, "admin").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn upload(app: &axum::Router, id: &str, bytes: &'static [u8]) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(format!("/api/v1/dignitaries/{id}/portrait"))
        .header(ROLE_HEADER, "admin")
        .body(Body::from(bytes))
        .expect("request should build");
    let (status, body) = send(app, request).await;
    (status, as_json(&body))
}

#[tokio::test]
async fn portrait_upload_round_trips_through_blob_store() {
    let app = app_with(PortraitSink::Blob(Arc::new(InMemoryBlobStore::new())));
    let id = create(&app, "Jane Doe", "Foreign Minister", "Started").await;

    let (status, body) = upload(&app, &id, PNG).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body["data"]["portraitImage"]
            .as_str()
            .expect("portrait reference")
            .starts_with("blob:")
    );

    let request = Request::builder()
        .uri(format!("/api/v1/dignitaries/{id}/portrait"))
        .body(Body::empty())
        .expect("request should build");
    let response = app.clone().oneshot(request).await.expect("response expected");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    assert_eq!(&bytes[..], PNG);
}

#[tokio::test]
async fn non_image_upload_leaves_record_unchanged() {
    let app = app();
    let id = create(&app, "Jane Doe", "Foreign Minister", "Started").await;

    let (status, body) = upload(&app, &id, b"definitely not an image").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["portraitImage"], Value::Null);

    let (status, _) = send_empty(
        &app,
        Method::GET,
        &format!("/api/v1/dignitaries/{id}/portrait"),
        "admin",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn external_portrait_link_is_not_served() {
    let app = app();
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/dignitaries",
        "admin",
        json!({
            "name": "John Smith",
            "designation": "Ambassador",
            "organization": "United Nations",
            "portraitImage": "https://example.org/john.png"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().expect("id");

    let (status, body) = send_empty(
        &app,
        Method::GET,
        &format!("/api/v1/dignitaries/{id}/portrait"),
        "lo",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}
