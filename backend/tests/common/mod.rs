//! Common test utilities for integration tests
//!
//! The router runs over a shared [`MemoryStore`], so tests can seed rows
//! directly (meals on chosen dates, for instance) and then hit the API.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use calorie_tracker_backend::{
    config::AppConfig,
    repositories::{CreateDish, CreateMeal, DishStore, MealStore, MemoryStore},
    routes,
    state::AppState,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store
    pub fn new() -> Self {
        Self::with_config(AppConfig::for_tests())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::with_store(store.clone(), config);
        let app = routes::create_router(state);

        Self { app, store }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("DELETE")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// GET and parse a JSON body, asserting 200
    pub async fn get_json(&self, path: &str) -> Value {
        let (status, body) = self.get(path).await;
        assert_eq!(status, StatusCode::OK, "GET {path} returned {body}");
        serde_json::from_str(&body).unwrap()
    }

    /// Create a user through the API and return the response body
    pub async fn create_user(&self, email: &str, goal: &str) -> Value {
        let body = json!({
            "name": "Ivan",
            "email": email,
            "age": 22,
            "weight": 72.3,
            "height": 171.0,
            "gender": "MALE",
            "goal": goal
        });

        let (status, response) = self.post("/users", &body.to_string()).await;
        assert_eq!(status, StatusCode::CREATED, "create user returned {response}");
        serde_json::from_str(&response).unwrap()
    }

    /// Insert a meal on a specific date with dishes of the given calories
    pub async fn seed_meal(&self, user_id: i64, on: NaiveDate, calories: &[f64]) -> i64 {
        let meal = MealStore::create(
            self.store.as_ref(),
            CreateMeal {
                user_id,
                created_at: on,
                dish_ids: vec![],
            },
        )
        .await
        .unwrap();

        for (i, kcal) in calories.iter().enumerate() {
            DishStore::create(
                self.store.as_ref(),
                CreateDish {
                    name: format!("Dish {}", i + 1),
                    calories: *kcal,
                    proteins: 0.0,
                    fats: 0.0,
                    carbohydrates: 0.0,
                    meal_id: Some(meal.id),
                },
            )
            .await
            .unwrap();
        }

        meal.id
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn id_of(value: &Value) -> i64 {
    value["id"].as_i64().unwrap()
}
