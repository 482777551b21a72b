//! Integration tests for the shipment lifecycle, listing, and search.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The exship server running (cargo run -p exship-server)
//!
//! Run with: cargo test -p exship-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use exship_core::{ShipmentId, TrackingNumber};
use exship_integration_tests::{admin_client, anonymous_client, base_url, user_client};

/// Test helper: create a shipment and return its JSON representation.
async fn create_shipment(client: &reqwest::Client, origin: &str) -> Value {
    let resp = client
        .post(format!("{}/api/shipments", base_url()))
        .json(&json!({ "originCountry": origin }))
        .send()
        .await
        .expect("Failed to create shipment");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["ok"], true);
    body["shipment"].clone()
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running exship server and PostgreSQL"]
async fn test_create_shipment_identifier_formats() {
    let client = admin_client();
    let shipment = create_shipment(&client, "us").await;

    let shipment_id = shipment["shipmentId"].as_str().expect("shipmentId");
    let tracking = shipment["trackingNumber"].as_str().expect("trackingNumber");

    assert!(ShipmentId::parse(shipment_id).is_ok(), "{shipment_id}");
    assert!(TrackingNumber::parse(tracking).is_ok(), "{tracking}");
    assert!(tracking.contains("US"));
    assert_eq!(shipment["status"], "created");
}

#[tokio::test]
#[ignore = "Requires running exship server and PostgreSQL"]
async fn test_cancellation_scenario() {
    // The end-to-end cancellation flow: cancel, verify the stamp, move the
    // status forward again and verify the stamp survives.
    let client = admin_client();
    let shipment = create_shipment(&client, "de").await;
    let shipment_id = shipment["shipmentId"].as_str().expect("shipmentId");
    let tracking = shipment["trackingNumber"].as_str().expect("trackingNumber");

    let resp = client
        .post(format!("{}/api/shipments/status", base_url()))
        .json(&json!({ "shipmentId": shipment_id, "status": "Cancelled" }))
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["ok"], true);

    let resp = anonymous_client()
        .get(format!("{}/api/track/{tracking}", base_url()))
        .send()
        .await
        .expect("Failed to track");
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["shipment"]["status"], "Cancelled");
    assert!(!body["shipment"]["cancelledAt"].is_null());
    assert_eq!(body["shipment"]["statusNote"], "");
    let cancelled_at = body["shipment"]["cancelledAt"].clone();

    // Moving on from cancelled must not clear the stamp
    let resp = client
        .post(format!("{}/api/shipments/status", base_url()))
        .json(&json!({ "shipmentId": shipment_id, "status": "In Transit" }))
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = anonymous_client()
        .get(format!("{}/api/track/{tracking}", base_url()))
        .send()
        .await
        .expect("Failed to track");
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["shipment"]["status"], "In Transit");
    assert_eq!(body["shipment"]["cancelledAt"], cancelled_at);
}

#[tokio::test]
#[ignore = "Requires running exship server and PostgreSQL"]
async fn test_update_status_requires_fields() {
    let client = admin_client();

    let resp = client
        .post(format!("{}/api/shipments/status", base_url()))
        .json(&json!({ "shipmentId": "EXS-240101-ABCDEF" }))
        .send()
        .await
        .expect("Failed to send");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
#[ignore = "Requires running exship server and PostgreSQL"]
async fn test_update_status_rejects_standard_users() {
    let client = user_client("somebody@example.com");

    let resp = client
        .post(format!("{}/api/shipments/status", base_url()))
        .json(&json!({ "shipmentId": "EXS-240101-ABCDEF", "status": "lost" }))
        .send()
        .await
        .expect("Failed to send");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Listing & Visibility Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running exship server and PostgreSQL"]
async fn test_list_requires_identity() {
    let resp = anonymous_client()
        .get(format!("{}/api/shipments", base_url()))
        .send()
        .await
        .expect("Failed to send");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running exship server and PostgreSQL"]
async fn test_list_limit_is_capped() {
    let client = admin_client();

    let resp = client
        .get(format!("{}/api/shipments?limit=500", base_url()))
        .send()
        .await
        .expect("Failed to send");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    let results = body["results"].as_array().expect("results array");
    assert!(results.len() <= 50);
}

#[tokio::test]
#[ignore = "Requires running exship server and PostgreSQL"]
async fn test_visibility_scoping_between_users() {
    let owner = user_client("owner-scope@example.com");
    let stranger = user_client("stranger-scope@example.com");

    let shipment = create_shipment(&owner, "fr").await;
    let shipment_id = shipment["shipmentId"].as_str().expect("shipmentId");

    let body: Value = owner
        .get(format!("{}/api/shipments", base_url()))
        .send()
        .await
        .expect("Failed to send")
        .json()
        .await
        .expect("Failed to parse response");
    let mine: Vec<&str> = body["results"]
        .as_array()
        .expect("results array")
        .iter()
        .filter_map(|s| s["shipmentId"].as_str())
        .collect();
    assert!(mine.contains(&shipment_id));

    let body: Value = stranger
        .get(format!("{}/api/shipments", base_url()))
        .send()
        .await
        .expect("Failed to send")
        .json()
        .await
        .expect("Failed to parse response");
    let theirs: Vec<&str> = body["results"]
        .as_array()
        .expect("results array")
        .iter()
        .filter_map(|s| s["shipmentId"].as_str())
        .collect();
    assert!(!theirs.contains(&shipment_id));
}

// ============================================================================
// Search Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running exship server and PostgreSQL"]
async fn test_search_prefix_matches_case_insensitively() {
    let client = admin_client();
    let shipment = create_shipment(&client, "us").await;
    let tracking = shipment["trackingNumber"].as_str().expect("trackingNumber");
    let prefix = tracking[..4].to_lowercase();

    let resp = client
        .get(format!("{}/api/shipments/search?q={prefix}", base_url()))
        .send()
        .await
        .expect("Failed to send");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    let items = body["items"].as_array().expect("items array");
    assert!(items.len() <= 8);
    assert!(
        items
            .iter()
            .any(|i| i["trackingNumber"].as_str() == Some(tracking))
    );
}

#[tokio::test]
#[ignore = "Requires running exship server and PostgreSQL"]
async fn test_search_empty_query_returns_empty() {
    let client = admin_client();

    let resp = client
        .get(format!("{}/api/shipments/search?q=%20%20", base_url()))
        .send()
        .await
        .expect("Failed to send");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["items"].as_array().expect("items array").len(), 0);
}

#[tokio::test]
#[ignore = "Requires running exship server and PostgreSQL"]
async fn test_search_wildcards_are_literal() {
    let client = admin_client();

    let resp = client
        .get(format!("{}/api/shipments/search?q=%25", base_url()))
        .send()
        .await
        .expect("Failed to send");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    // A bare '%' must match nothing, not everything
    assert_eq!(body["items"].as_array().expect("items array").len(), 0);
}

// ============================================================================
// Public Tracking Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running exship server and PostgreSQL"]
async fn test_track_unknown_number_is_404() {
    let resp = anonymous_client()
        .get(format!("{}/api/track/EX24XX0000000A", base_url()))
        .send()
        .await
        .expect("Failed to send");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
#[ignore = "Requires running exship server and PostgreSQL"]
async fn test_track_returns_history() {
    let client = admin_client();
    let shipment = create_shipment(&client, "gb").await;
    let shipment_id = shipment["shipmentId"].as_str().expect("shipmentId");
    let tracking = shipment["trackingNumber"].as_str().expect("trackingNumber");

    client
        .post(format!("{}/api/shipments/status", base_url()))
        .json(&json!({
            "shipmentId": shipment_id,
            "status": "In Transit",
            "statusNote": "departed origin facility"
        }))
        .send()
        .await
        .expect("Failed to update status");

    let body: Value = anonymous_client()
        .get(format!("{}/api/track/{tracking}", base_url()))
        .send()
        .await
        .expect("Failed to track")
        .json()
        .await
        .expect("Failed to parse response");

    let history = body["history"].as_array().expect("history array");
    assert!(history.len() >= 2);
    // Chronological order: the creation event comes first
    assert_eq!(history[0]["status"], "created");
    assert_eq!(
        history.last().expect("non-empty")["note"],
        "departed origin facility"
    );
}
