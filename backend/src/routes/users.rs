//! User API routes

use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use calorie_tracker_shared::{CreateUserRequest, UpdateUserRequest, UserResponse};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).post(update_user).delete(delete_user))
}

/// GET /users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses((status = 200, description = "All users", body = [UserResponse]))
)]
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    Ok(Json(UserService::list(state.users()).await?))
}

/// GET /users/:id
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "User not found", body = String, content_type = "text/plain")
    )
)]
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(UserService::get(state.users(), id).await?))
}

/// POST /users - Create a user and compute their daily calorie intake
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created with a computed intake", body = UserResponse),
        (status = 400, description = "One `\"field\" - message` line per invalid field", body = String, content_type = "text/plain"),
        (status = 409, description = "Email is already in use", body = String, content_type = "text/plain")
    )
)]
async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = UserService::create(state.users(), req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /users/:id - Partial update; omitted fields are left untouched
#[utoipa::path(
    post,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid fields or incomplete body metrics", body = String, content_type = "text/plain"),
        (status = 404, description = "User not found", body = String, content_type = "text/plain"),
        (status = 409, description = "Email is already in use", body = String, content_type = "text/plain")
    )
)]
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(UserService::update(state.users(), id, req).await?))
}

/// DELETE /users/:id - Also deletes the user's meals
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User and their meals deleted"),
        (status = 404, description = "User not found", body = String, content_type = "text/plain")
    )
)]
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    UserService::delete(state.users(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
