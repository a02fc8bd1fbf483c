//! Integration tests for the OpenAPI document endpoint

mod common;

use axum::http::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);

    let doc: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(doc["info"]["title"], "Calorie Tracker API");
    assert!(doc["openapi"].as_str().unwrap().starts_with("3."));

    let history = &doc["paths"]["/users/{id}/reports/history"]["get"];
    let params: Vec<&str> = history["parameters"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(params, vec!["id", "startDate", "endDate"]);

    assert!(doc["paths"]["/meals/{id}"]["delete"].is_object());
    assert!(doc["paths"]["/meals/{id}"]["post"].is_null());
}

#[tokio::test]
async fn test_openapi_schemas_use_wire_names() {
    let app = common::TestApp::new();

    let doc = app.get_json("/api-docs/openapi.json").await;
    let schemas = &doc["components"]["schemas"];

    assert!(schemas["UserResponse"]["properties"]["dailyCalorieIntake"].is_object());
    assert!(schemas["CreateMealRequest"]["properties"]["userId"].is_object());

    let goals: Vec<&str> = schemas["Goal"]["enum"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(goals, vec!["WEIGHT_LOSS", "MAINTENANCE", "WEIGHT_GAIN"]);
}
