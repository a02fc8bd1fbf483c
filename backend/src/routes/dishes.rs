//! Dish API routes

use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::services::DishService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use calorie_tracker_shared::{CreateDishRequest, DishResponse, UpdateDishRequest};

/// Create dish routes
pub fn dish_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_dishes).post(create_dish))
        .route("/:id", get(get_dish).post(update_dish).delete(delete_dish))
}

/// GET /dishes
#[utoipa::path(
    get,
    path = "/dishes",
    tag = "dishes",
    responses((status = 200, description = "All dishes", body = [DishResponse]))
)]
async fn list_dishes(State(state): State<AppState>) -> Result<Json<Vec<DishResponse>>, ApiError> {
    Ok(Json(DishService::list(state.dishes()).await?))
}

/// GET /dishes/:id
#[utoipa::path(
    get,
    path = "/dishes/{id}",
    tag = "dishes",
    params(("id" = i64, Path, description = "Dish id")),
    responses(
        (status = 200, description = "The dish", body = DishResponse),
        (status = 404, description = "Dish not found", body = String, content_type = "text/plain")
    )
)]
async fn get_dish(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DishResponse>, ApiError> {
    Ok(Json(DishService::get(state.dishes(), id).await?))
}

/// POST /dishes
#[utoipa::path(
    post,
    path = "/dishes",
    tag = "dishes",
    request_body = CreateDishRequest,
    responses(
        (status = 201, description = "Dish created", body = DishResponse),
        (status = 400, description = "One `\"field\" - message` line per invalid field", body = String, content_type = "text/plain"),
        (status = 404, description = "Meal not found", body = String, content_type = "text/plain")
    )
)]
async fn create_dish(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateDishRequest>,
) -> Result<(StatusCode, Json<DishResponse>), ApiError> {
    let dish = DishService::create(state.dishes(), state.meals(), req).await?;
    Ok((StatusCode::CREATED, Json(dish)))
}

/// POST /dishes/:id - Partial update; `"mealId": null` detaches the dish
#[utoipa::path(
    post,
    path = "/dishes/{id}",
    tag = "dishes",
    params(("id" = i64, Path, description = "Dish id")),
    request_body = UpdateDishRequest,
    responses(
        (status = 200, description = "Updated dish", body = DishResponse),
        (status = 400, description = "Invalid fields", body = String, content_type = "text/plain"),
        (status = 404, description = "Dish or meal not found", body = String, content_type = "text/plain")
    )
)]
async fn update_dish(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateDishRequest>,
) -> Result<Json<DishResponse>, ApiError> {
    let dish = DishService::update(state.dishes(), state.meals(), id, req).await?;
    Ok(Json(dish))
}

/// DELETE /dishes/:id
#[utoipa::path(
    delete,
    path = "/dishes/{id}",
    tag = "dishes",
    params(("id" = i64, Path, description = "Dish id")),
    responses(
        (status = 204, description = "Dish deleted"),
        (status = 404, description = "Dish not found", body = String, content_type = "text/plain")
    )
)]
async fn delete_dish(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    DishService::delete(state.dishes(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
