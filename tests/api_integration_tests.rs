//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle, including that cached listings
//! reflect writes made through the API.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use garage_cache::api::create_router;
use garage_cache::cache::{KvStore, MemoryBackend};
use garage_cache::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let store = KvStore::with_backend(Arc::new(MemoryBackend::new()));
    create_router(AppState::in_memory(store))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Health ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

// == Customers ==

#[tokio::test]
async fn test_cached_listing_reflects_new_customer() {
    let app = create_test_app();

    let (status, created) = send(
        &app,
        "POST",
        "/teams/1/customers",
        Some(json!({"name": "Ann", "email": "ann@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["team_id"], 1);

    // Populates the listing and count keys
    let (_, page) = send(&app, "GET", "/teams/1/customers", None).await;
    assert_eq!(page["total"], 1);

    send(
        &app,
        "POST",
        "/teams/1/customers",
        Some(json!({"name": "Bob"})),
    )
    .await;

    let (status, page) = send(&app, "GET", "/teams/1/customers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_listing_is_team_scoped() {
    let app = create_test_app();

    send(&app, "POST", "/teams/1/customers", Some(json!({"name": "Ann"}))).await;
    send(&app, "GET", "/teams/2/customers", None).await;
    send(&app, "POST", "/teams/2/customers", Some(json!({"name": "Cy"}))).await;

    let (_, team_one) = send(&app, "GET", "/teams/1/customers", None).await;
    let (_, team_two) = send(&app, "GET", "/teams/2/customers", None).await;
    assert_eq!(team_one["total"], 1);
    assert_eq!(team_two["total"], 1);
    assert_eq!(team_two["items"][0]["name"], "Cy");
}

#[tokio::test]
async fn test_update_customer_refreshes_cached_record() {
    let app = create_test_app();

    let (_, created) = send(&app, "POST", "/teams/1/customers", Some(json!({"name": "Ann"}))).await;
    let uri = format!("/customers/{}", created["id"]);

    let (_, before) = send(&app, "GET", &uri, None).await;
    assert_eq!(before["name"], "Ann");

    let (status, _) = send(&app, "PUT", &uri, Some(json!({"name": "Annie"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = send(&app, "GET", &uri, None).await;
    assert_eq!(after["name"], "Annie");
}

#[tokio::test]
async fn test_delete_customer_then_not_found() {
    let app = create_test_app();

    let (_, created) = send(&app, "POST", "/teams/1/customers", Some(json!({"name": "Ann"}))).await;
    let uri = format!("/customers/{}", created["id"]);
    send(&app, "GET", &uri, None).await;

    let (status, json) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], created["id"]);

    let (status, json) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_create_customer_validation_error() {
    let app = create_test_app();

    let body = json!({"name": "  "});
    let (status, json) = send(&app, "POST", "/teams/1/customers", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_unknown_customer_returns_404() {
    let app = create_test_app();

    let (status, _) = send(&app, "GET", "/customers/999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Dashboard ==

#[tokio::test]
async fn test_dashboard_tracks_service_records() {
    let app = create_test_app();

    let ann = json!({"name": "Ann"});
    let (_, customer) = send(&app, "POST", "/teams/4/customers", Some(ann)).await;
    let records_uri = format!("/customers/{}/service-records", customer["id"]);

    let (_, empty) = send(&app, "GET", "/teams/4/dashboard", None).await;
    assert_eq!(empty["stats"]["total_revenue"], 0);
    assert_eq!(empty["stats"]["total_customers"], 1);
    assert_eq!(empty["chart"].as_array().unwrap().len(), 30);
    assert_eq!(empty["monthly_earnings"], 0);

    let (status, _) = send(
        &app,
        "POST",
        &records_uri,
        Some(json!({"description": "Brake pads", "total_cost": 12000, "status": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, dashboard) = send(&app, "GET", "/teams/4/dashboard", None).await;
    assert_eq!(dashboard["stats"]["total_revenue"], 12000);
    assert_eq!(dashboard["stats"]["total_service_records"], 1);
    assert_eq!(dashboard["chart"][29]["revenue"], 12000);
    assert_eq!(dashboard["yearly_breakup"][0]["revenue"], 12000);
    assert_eq!(dashboard["monthly_earnings"], 12000);

    let (_, records) = send(&app, "GET", &records_uri, None).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_completing_service_record_updates_cached_dashboard() {
    let app = create_test_app();

    let ann = json!({"name": "Ann"});
    let (_, customer) = send(&app, "POST", "/teams/5/customers", Some(ann)).await;
    let (_, record) = send(
        &app,
        "POST",
        &format!("/customers/{}/service-records", customer["id"]),
        Some(json!({"description": "Clutch", "total_cost": 30000})),
    )
    .await;
    assert_eq!(record["status"], "pending");

    let (_, before) = send(&app, "GET", "/teams/5/dashboard", None).await;
    assert_eq!(before["stats"]["total_revenue"], 0);
    assert_eq!(before["monthly_earnings"], 0);

    let record_uri = format!("/service-records/{}", record["id"]);
    let (status, updated) = send(
        &app,
        "PUT",
        &record_uri,
        Some(json!({"description": "Clutch", "total_cost": 30000, "status": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");

    let (_, after) = send(&app, "GET", "/teams/5/dashboard", None).await;
    assert_eq!(after["stats"]["total_revenue"], 30000);
    assert_eq!(after["chart"][29]["revenue"], 30000);
    assert_eq!(after["monthly_earnings"], 30000);

    let (status, fetched) = send(&app, "GET", &record_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "completed");
}

#[tokio::test]
async fn test_delete_service_record_updates_cached_dashboard() {
    let app = create_test_app();

    let ann = json!({"name": "Ann"});
    let (_, customer) = send(&app, "POST", "/teams/6/customers", Some(ann)).await;
    let (_, record) = send(
        &app,
        "POST",
        &format!("/customers/{}/service-records", customer["id"]),
        Some(json!({"description": "Tyres", "total_cost": 8000, "status": "completed"})),
    )
    .await;

    let (_, before) = send(&app, "GET", "/teams/6/dashboard", None).await;
    assert_eq!(before["stats"]["total_service_records"], 1);

    let record_uri = format!("/service-records/{}", record["id"]);
    let (status, _) = send(&app, "DELETE", &record_uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = send(&app, "GET", "/teams/6/dashboard", None).await;
    assert_eq!(after["stats"]["total_service_records"], 0);
    assert_eq!(after["stats"]["total_revenue"], 0);
    assert_eq!(after["yearly_breakup"].as_array().unwrap().len(), 0);

    let (status, _) = send(&app, "GET", &record_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_service_record_for_unknown_customer() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/customers/42/service-records",
        Some(json!({"description": "Oil", "total_cost": 100})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Staff and Bookings ==

#[tokio::test]
async fn test_staff_flow() {
    let app = create_test_app();

    send(&app, "GET", "/teams/1/staff", None).await;
    let (status, member) = send(
        &app,
        "POST",
        "/teams/1/staff",
        Some(json!({"name": "Sam", "role": "Mechanic"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, page) = send(&app, "GET", "/teams/1/staff", None).await;
    assert_eq!(page["total"], 1);

    let member_uri = format!("/staff/{}", member["id"]);
    let body = json!({"name": "Sam", "role": "Foreman"});
    let (status, _) = send(&app, "PUT", &member_uri, Some(body)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, page) = send(&app, "GET", "/teams/1/staff", None).await;
    assert_eq!(page["items"][0]["role"], "Foreman");

    let (status, _) = send(&app, "DELETE", &member_uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, page) = send(&app, "GET", "/teams/1/staff", None).await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_bookings_flow() {
    let app = create_test_app();

    let (_, page) = send(&app, "GET", "/bookings?page=1&page_size=5", None).await;
    assert_eq!(page["total"], 0);

    let (status, booking) = send(
        &app,
        "POST",
        "/bookings",
        Some(json!({
            "customer_name": "Ann",
            "email": "ann@example.com",
            "service": "MOT",
            "date": "2026-11-02"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["date"], "2026-11-02");

    let (_, page) = send(&app, "GET", "/bookings?page=1&page_size=5", None).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["page_size"], 5);

    let (status, _) = send(&app, "DELETE", &format!("/bookings/{}", booking["id"]), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, page) = send(&app, "GET", "/bookings?page=1&page_size=5", None).await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_booking_with_bad_email_rejected() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/bookings",
        Some(json!({
            "customer_name": "Ann",
            "email": "not-an-email",
            "service": "MOT",
            "date": "2026-11-02"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Cache Admin ==

#[tokio::test]
async fn test_stats_endpoint_counts_hits_and_misses() {
    let app = create_test_app();

    send(&app, "GET", "/bookings", None).await;
    send(&app, "GET", "/bookings", None).await;

    let (status, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"]["state"], "enabled");
    assert_eq!(json["backend"], "memory");
    // Listing and count each miss once, then hit once
    assert_eq!(json["misses"], 2);
    assert_eq!(json["hits"], 2);
    assert_eq!(json["hit_rate"], 0.5);
}

#[tokio::test]
async fn test_flush_endpoint_empties_cache() {
    let app = create_test_app();

    send(&app, "GET", "/bookings", None).await;

    let (status, json) = send(&app, "DELETE", "/admin/cache", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].is_string());

    send(&app, "GET", "/bookings", None).await;
    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["hits"], 0);
    assert_eq!(stats["misses"], 4);
}

#[tokio::test]
async fn test_disabled_store_still_serves_requests() {
    let app = create_router(AppState::in_memory(KvStore::disabled()));

    send(&app, "POST", "/teams/1/customers", Some(json!({"name": "Ann"}))).await;
    let (status, page) = send(&app, "GET", "/teams/1/customers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["status"]["state"], "disabled");
    assert_eq!(stats["backend"], "none");
    assert_eq!(stats["hits"], 0);
}
