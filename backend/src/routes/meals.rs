//! Meal API routes
//!
//! Meals have no update endpoint: the creation date is fixed and dishes
//! are moved between meals through the dish endpoints.

use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::services::MealService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use calorie_tracker_shared::{CreateMealRequest, MealResponse};

/// Create meal routes
pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_meals).post(create_meal))
        .route("/:id", get(get_meal).delete(delete_meal))
}

/// GET /meals
#[utoipa::path(
    get,
    path = "/meals",
    tag = "meals",
    responses((status = 200, description = "All meals", body = [MealResponse]))
)]
async fn list_meals(State(state): State<AppState>) -> Result<Json<Vec<MealResponse>>, ApiError> {
    Ok(Json(MealService::list(state.meals()).await?))
}

/// GET /meals/:id
#[utoipa::path(
    get,
    path = "/meals/{id}",
    tag = "meals",
    params(("id" = i64, Path, description = "Meal id")),
    responses(
        (status = 200, description = "The meal", body = MealResponse),
        (status = 404, description = "Meal not found", body = String, content_type = "text/plain")
    )
)]
async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MealResponse>, ApiError> {
    Ok(Json(MealService::get(state.meals(), id).await?))
}

/// POST /meals - Create a meal dated today, attaching any listed dishes
#[utoipa::path(
    post,
    path = "/meals",
    tag = "meals",
    request_body = CreateMealRequest,
    responses(
        (status = 201, description = "Meal created for today", body = MealResponse),
        (status = 400, description = "One `\"field\" - message` line per invalid field", body = String, content_type = "text/plain"),
        (status = 404, description = "User or dish not found", body = String, content_type = "text/plain")
    )
)]
async fn create_meal(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateMealRequest>,
) -> Result<(StatusCode, Json<MealResponse>), ApiError> {
    let meal = MealService::create(state.users(), state.meals(), state.dishes(), req).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

/// DELETE /meals/:id - Detaches the meal's dishes
#[utoipa::path(
    delete,
    path = "/meals/{id}",
    tag = "meals",
    params(("id" = i64, Path, description = "Meal id")),
    responses(
        (status = 204, description = "Meal deleted and its dishes detached"),
        (status = 404, description = "Meal not found", body = String, content_type = "text/plain")
    )
)]
async fn delete_meal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    MealService::delete(state.meals(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
