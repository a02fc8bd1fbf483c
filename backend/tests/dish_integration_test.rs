//! Integration tests for dish endpoints

mod common;

use axum::http::StatusCode;
use common::id_of;
use serde_json::{json, Value};

async fn create_dish(app: &common::TestApp, body: Value) -> Value {
    let (status, response) = app.post("/dishes", &body.to_string()).await;
    assert_eq!(status, StatusCode::CREATED, "create dish returned {response}");
    serde_json::from_str(&response).unwrap()
}

#[tokio::test]
async fn test_create_dish_defaults_nutrients() {
    let app = common::TestApp::new();

    let dish = create_dish(&app, json!({"name": "Green tea"})).await;

    assert_eq!(dish["name"], "Green tea");
    assert_eq!(dish["calories"], 0.0);
    assert_eq!(dish["carbohydrates"], 0.0);
    assert_eq!(dish["mealId"], Value::Null);
}

#[tokio::test]
async fn test_create_dish_rejects_negative_nutrients() {
    let app = common::TestApp::new();
    let body = json!({"name": "Broken", "calories": -5, "fats": -1});

    let (status, response) = app.post("/dishes", &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response,
        "\"calories\" - must be greater than or equal to 0\n\"fats\" - must be greater than or equal to 0"
    );
}

#[tokio::test]
async fn test_create_dish_without_name_is_listed() {
    let app = common::TestApp::new();

    let (status, response) = app.post("/dishes", r#"{"name":null,"calories":120}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, "\"name\" - must not be null");

    let (status, response) = app.post("/dishes", r#"{"calories":120}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, "\"name\" - must not be null");
}

#[tokio::test]
async fn test_create_dish_null_nutrient_defaults_to_zero() {
    let app = common::TestApp::new();

    let dish = create_dish(&app, json!({"name": "Water", "calories": null})).await;

    assert_eq!(dish["calories"], 0.0);
}

#[tokio::test]
async fn test_create_dish_for_missing_meal_is_not_found() {
    let app = common::TestApp::new();
    let body = json!({"name": "Soup", "calories": 150, "mealId": 404});

    let (status, response) = app.post("/dishes", &body.to_string()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response, "Meal not found");
}

#[tokio::test]
async fn test_dish_attached_to_meal_shows_in_meal() {
    let app = common::TestApp::new();
    let user = app.create_user("ivan@example.com", "MAINTENANCE").await;
    let meal_id = app.seed_meal(id_of(&user), common::date(2024, 1, 1), &[]).await;

    let dish = create_dish(&app, json!({"name": "Pelmeni", "calories": 420, "mealId": meal_id})).await;

    let meal = app.get_json(&format!("/meals/{meal_id}")).await;
    assert_eq!(meal["dishIds"], json!([id_of(&dish)]));
}

#[tokio::test]
async fn test_partial_update_and_detach() {
    let app = common::TestApp::new();
    let user = app.create_user("ivan@example.com", "MAINTENANCE").await;
    let meal_id = app.seed_meal(id_of(&user), common::date(2024, 1, 1), &[]).await;
    let dish = create_dish(
        &app,
        json!({"name": "Kasha", "calories": 200, "proteins": 6, "mealId": meal_id}),
    )
    .await;
    let path = format!("/dishes/{}", id_of(&dish));

    let (status, response) = app.post(&path, r#"{"calories":250}"#).await;
    assert_eq!(status, StatusCode::OK);
    let updated: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(updated["calories"], 250.0);
    assert_eq!(updated["proteins"], 6.0);
    assert_eq!(updated["name"], "Kasha");
    assert_eq!(updated["mealId"], meal_id);

    let (status, response) = app.post(&path, r#"{"mealId":null}"#).await;
    assert_eq!(status, StatusCode::OK);
    let detached: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(detached["mealId"], Value::Null);
    assert_eq!(detached["calories"], 250.0);
}

#[tokio::test]
async fn test_update_null_calories_is_rejected() {
    let app = common::TestApp::new();
    let dish = create_dish(&app, json!({"name": "Bread", "calories": 80})).await;

    let (status, response) = app
        .post(&format!("/dishes/{}", id_of(&dish)), r#"{"calories":null}"#)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, "\"calories\" - must not be null");
}

#[tokio::test]
async fn test_missing_dish_is_not_found() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/dishes/7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Dish not found");

    let (status, _) = app.post("/dishes/7", r#"{"name":"x"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete("/dishes/7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_dish() {
    let app = common::TestApp::new();
    let dish = create_dish(&app, json!({"name": "Cake", "calories": 500})).await;
    let path = format!("/dishes/{}", id_of(&dish));

    let (status, _) = app.delete(&path).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let all = app.get_json("/dishes").await;
    assert!(all.as_array().unwrap().is_empty());
}
