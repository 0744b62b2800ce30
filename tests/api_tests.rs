//! End-to-end tests for the HTTP API against the in-memory store.

mod common;

use axum::http::{header, StatusCode};
use common::TestApp;
use serde_json::{json, Value};

const SCENARIO_A_COMPLETED: [&str; 7] = [
    "warehouse_in",
    "sanding",
    "assembly",
    "coloring",
    "accessories",
    "inspection",
    "coating",
];

fn tracking_body(process: &str, status: &str, quantity: u32) -> Value {
    json!({
        "processId": process,
        "trackingData": { "status": status, "quantity_completed": quantity }
    })
}

fn order_id(order: &Value) -> String {
    order["order_id"].as_str().expect("order_id").to_string()
}

#[tokio::test]
async fn create_order_initializes_tracking() {
    let app = TestApp::new().await;
    let order = app
        .create_order(json!({
            "customerName": "Hotel Mulia",
            "product": "Teak lounge chair",
            "qty": 12,
            "targetDate": "2025-12-01",
            "requiresWelding": true
        }))
        .await;

    assert!(order_id(&order).starts_with("ORD-"));
    assert_eq!(order["customer_name"], "Hotel Mulia");
    assert_eq!(order["quantity"], 12);
    assert_eq!(order["target_date"], "2025-12-01");
    assert_eq!(order["current_status"], "pending");
    assert_eq!(order["progress"], 0);
    assert_eq!(order["risk_level"], "LOW");

    let tracking = order["tracking"].as_array().unwrap();
    assert_eq!(tracking.len(), 10);
    assert_eq!(tracking[0]["process"], "warehouse_in");
    assert_eq!(tracking[9]["process"], "warehouse_out");
    assert!(tracking
        .iter()
        .all(|r| r["status"] == "pending" && r["quantity_completed"] == 0));
}

#[tokio::test]
async fn create_order_rejects_zero_quantity() {
    let app = TestApp::new().await;
    let response = app.post("/api/v1/orders", json!({ "quantity": 0 })).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Bad Request");
}

#[tokio::test]
async fn quantities_beyond_storage_range_are_rejected() {
    let app = TestApp::with_database().await;
    let response = app
        .post("/api/v1/orders", json!({ "quantity": 3_000_000_000u64 }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let id = order_id(&app.create_order(json!({ "quantity": 2 })).await);
    let patch = app
        .put(
            &format!("/api/v1/orders/{id}"),
            json!({ "riskScore": 4_000_000_000u64 }),
        )
        .await;
    assert_eq!(patch.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tracking_updates_drive_progress_to_completion() {
    let app = TestApp::new().await;
    let order = app
        .create_order(json!({ "quantity": 5, "requires_accessories": true }))
        .await;
    let id = order_id(&order);
    let uri = format!("/api/v1/orders/{id}/tracking");

    let mut last = Value::Null;
    for process in SCENARIO_A_COMPLETED {
        let response = app.put(&uri, tracking_body(process, "completed", 5)).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        last = response.json();
    }
    assert_eq!(last["progress"], 78);
    assert_eq!(last["current_status"], "in_progress");

    for process in ["packaging", "warehouse_out"] {
        last = app
            .put(&uri, tracking_body(process, "completed", 5))
            .await
            .json();
    }
    assert_eq!(last["progress"], 100);
    assert_eq!(last["current_status"], "completed");

    let record = last["tracking"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["process"] == "packaging")
        .unwrap();
    assert_eq!(record["status"], "completed");
    assert!(record["last_updated"].is_string());

    let stored = app.get(&format!("/api/v1/orders/{id}")).await.json();
    assert_eq!(stored["current_status"], "completed");
}

#[tokio::test]
async fn progress_on_inapplicable_stage_only_marks_in_progress() {
    let app = TestApp::new().await;
    let id = order_id(&app.create_order(json!({ "quantity": 3 })).await);

    let updated = app
        .put(
            &format!("/api/v1/orders/{id}/tracking"),
            tracking_body("welding", "in_progress", 1),
        )
        .await
        .json();

    assert_eq!(updated["progress"], 0);
    assert_eq!(updated["current_status"], "in_progress");
}

#[tokio::test]
async fn tracking_errors_are_reported() {
    let app = TestApp::new().await;
    let id = order_id(&app.create_order(json!({ "quantity": 1 })).await);

    let missing_parts = app
        .put(
            &format!("/api/v1/orders/{id}/tracking"),
            json!({ "processId": "sanding" }),
        )
        .await;
    assert_eq!(missing_parts.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        missing_parts.json()["message"],
        "Order ID, processId, and trackingData required"
    );

    let unknown_order = app
        .put(
            "/api/v1/orders/ORD-0/tracking",
            tracking_body("sanding", "completed", 1),
        )
        .await;
    assert_eq!(unknown_order.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown_order.json()["message"], "Order not found");

    let unknown_process = app
        .put(
            &format!("/api/v1/orders/{id}/tracking"),
            tracking_body("painting", "completed", 1),
        )
        .await;
    assert_eq!(unknown_process.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown_process.json()["message"], "Process not found");
}

#[tokio::test]
async fn error_bodies_carry_the_request_id() {
    let app = TestApp::new().await;
    let response = app
        .request(
            axum::http::Method::GET,
            "/api/v1/orders/ORD-404",
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let echoed = response
        .headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert_eq!(response.json()["request_id"], echoed);
}

#[tokio::test]
async fn order_patch_recomputes_derived_fields() {
    let app = TestApp::new().await;
    let id = order_id(&app.create_order(json!({ "quantity": 2 })).await);
    let uri = format!("/api/v1/orders/{id}");

    app.put(
        &format!("{uri}/tracking"),
        tracking_body("warehouse_in", "completed", 2),
    )
    .await;

    let raised = app.put(&uri, json!({ "quantity": 4, "notes": "rush" })).await;
    assert_eq!(raised.status, StatusCode::OK);
    let raised = raised.json();
    assert_eq!(raised["quantity"], 4);
    assert_eq!(raised["notes"], "rush");
    // the stage reported 2 of now 4 units, so nothing is complete
    assert_eq!(raised["progress"], 0);
    assert_eq!(raised["current_status"], "in_progress");

    let cleared = app.put(&uri, json!({ "targetDate": null })).await.json();
    assert!(cleared["target_date"].is_null());

    let missing = app.put("/api/v1/orders/ORD-0", json!({ "notes": "x" })).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_status_and_project() {
    let app = TestApp::new().await;
    let first = order_id(
        &app.create_order(json!({ "quantity": 1, "project_id": "PRJ-A" }))
            .await,
    );
    app.create_order(json!({ "quantity": 1, "project_id": "PRJ-B" }))
        .await;

    app.put(
        &format!("/api/v1/orders/{first}/tracking"),
        tracking_body("sanding", "in_progress", 1),
    )
    .await;

    let all = app.get("/api/v1/orders").await.json();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let in_progress = app.get("/api/v1/orders?status=in_progress").await.json();
    assert_eq!(in_progress.as_array().unwrap().len(), 1);
    assert_eq!(in_progress[0]["order_id"], first);

    let project_b = app.get("/api/v1/orders?project_id=PRJ-B").await.json();
    assert_eq!(project_b.as_array().unwrap().len(), 1);
    assert_eq!(project_b[0]["project_id"], "PRJ-B");

    let bad_filter = app.get("/api/v1/orders?status=shipped").await;
    assert_eq!(bad_filter.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_order_then_not_found() {
    let app = TestApp::new().await;
    let id = order_id(&app.create_order(json!({ "quantity": 1 })).await);
    let uri = format!("/api/v1/orders/{id}");

    let deleted = app.delete(&uri).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.json(), json!({ "message": "Order deleted successfully" }));

    assert_eq!(app.get(&uri).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&uri).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn project_crud() {
    let app = TestApp::new().await;
    let created = app
        .post(
            "/api/v1/projects",
            json!({ "projectName": "Lobby refit", "client": "Hotel Mulia", "targetDate": "2026-01-15" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let project = created.json();
    let id = project["project_id"].as_str().unwrap().to_string();
    assert!(id.starts_with("PRJ-"));
    assert_eq!(project["status"], "active");

    let uri = format!("/api/v1/projects/{id}");
    let updated = app.put(&uri, json!({ "status": "closed" })).await.json();
    assert_eq!(updated["status"], "closed");
    assert_eq!(updated["project_name"], "Lobby refit");

    assert_eq!(app.get("/api/v1/projects").await.json().as_array().unwrap().len(), 1);

    let deleted = app.delete(&uri).await.json();
    assert_eq!(deleted["message"], "Project deleted successfully");
    let gone = app.get(&uri).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.json()["message"], "Project not found");
}

#[tokio::test]
async fn settings_merge_at_top_level() {
    let app = TestApp::new().await;
    assert_eq!(app.get("/api/v1/settings").await.json(), json!({}));

    app.put(
        "/api/v1/settings",
        json!({ "company": "PT Kayu", "shifts": { "day": "07:00" } }),
    )
    .await;
    let merged = app
        .put("/api/v1/settings", json!({ "shifts": { "night": "19:00" } }))
        .await
        .json();

    assert_eq!(
        merged,
        json!({ "company": "PT Kayu", "shifts": { "night": "19:00" } })
    );
    assert_eq!(app.get("/api/v1/settings").await.json(), merged);
}

#[tokio::test]
async fn efficiency_targets_default_and_save() {
    let app = TestApp::new().await;
    let defaults = app.get("/api/v1/settings/efficiency").await.json();
    assert_eq!(defaults.as_object().unwrap().len(), 10);
    assert_eq!(defaults["sanding"]["name"], "Amplas");
    assert_eq!(defaults["sanding"]["targetTime"], 4);

    let custom = json!({
        "sanding": { "name": "Amplas", "targetTime": 3, "targetQuality": 96, "targetOutput": 92 }
    });
    let saved = app.post("/api/v1/settings/efficiency", custom.clone()).await;
    assert_eq!(saved.status, StatusCode::OK);
    assert_eq!(saved.json(), custom);
    assert_eq!(app.get("/api/v1/settings/efficiency").await.json(), custom);
    assert_eq!(app.get("/api/v1/settings").await.json()["efficiency"], custom);

    let unknown = app
        .put(
            "/api/v1/settings/efficiency",
            json!({ "painting": { "name": "Cat", "targetTime": 1, "targetQuality": 1, "targetOutput": 1 } }),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn export_targets() {
    let app = TestApp::new().await;
    app.create_order(json!({ "quantity": 2, "customer_name": "Budi, Ltd" }))
        .await;

    let orders = app.get("/api/v1/export/orders").await;
    assert_eq!(orders.status, StatusCode::OK);
    assert!(orders.headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert_eq!(
        orders.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"orders-export.csv\""
    );
    let body = orders.text();
    assert!(body.lines().next().unwrap().contains("customer_name"));
    assert!(body.contains("\"Budi, Ltd\""));

    let complete = app.get("/api/v1/export/complete").await.text();
    assert!(complete.starts_with("Orders\n"));
    assert!(complete.contains("\n\nProjects\n"));
    assert!(complete.contains("\n\nSettings\n"));

    let invalid = app.get("/api/v1/export/invoices").await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.json()["message"], "Invalid export target");
}

#[tokio::test]
async fn pipeline_catalog() {
    let app = TestApp::new().await;
    let stages = app.get("/api/v1/pipeline").await.json();
    let stages = stages.as_array().unwrap();

    assert_eq!(stages.len(), 10);
    assert_eq!(stages[4]["name"], "accessories");
    assert_eq!(stages[4]["applicability"], "requires_accessories");
    assert_eq!(stages[5]["applicability"], "requires_welding");
    assert_eq!(stages[0]["display_name"], "Gudang Masuk");
}

#[tokio::test]
async fn health_and_status() {
    let app = TestApp::new().await;

    let health = app.get("/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json()["status"], "up");

    let nested = app.get("/api/v1/health").await;
    assert_eq!(nested.status, StatusCode::OK);

    let live = app.get("/health/live").await.json();
    assert_eq!(live["alive"], true);

    let status = app.get("/api/v1/status").await.json();
    assert_eq!(status["service"], "production-tracker");
    assert_eq!(status["environment"], "test");
    assert_eq!(status["storage_backend"], "in-memory");
}

#[tokio::test]
async fn database_backed_order_lifecycle() {
    let app = TestApp::with_database().await;
    let id = order_id(
        &app.create_order(json!({ "quantity": 1, "requires_welding": true }))
            .await,
    );
    let uri = format!("/api/v1/orders/{id}");

    let updated = app
        .put(
            &format!("{uri}/tracking"),
            tracking_body("welding", "completed", 1),
        )
        .await
        .json();
    assert_eq!(updated["progress"], 11);
    assert_eq!(updated["current_status"], "in_progress");

    let stored = app.get(&uri).await.json();
    assert_eq!(stored["progress"], 11);
    assert_eq!(stored["tracking"][5]["status"], "completed");

    app.put("/api/v1/settings", json!({ "company": "PT Kayu" })).await;
    assert_eq!(
        app.get("/api/v1/settings").await.json()["company"],
        "PT Kayu"
    );

    let status = app.get("/api/v1/status").await.json();
    assert_eq!(status["storage_backend"], "database");

    assert_eq!(app.delete(&uri).await.status, StatusCode::OK);
    assert_eq!(app.get(&uri).await.status, StatusCode::NOT_FOUND);
}
