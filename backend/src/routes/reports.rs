//! Nutrition report routes, nested under `/users/:id/reports`

use crate::error::ApiError;
use crate::services::MealService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use calorie_tracker_shared::{DailyReport, DateQuery, HistoryQuery};

/// Create report routes
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/daily", get(daily_report))
        .route("/check-limit", get(check_limit))
        .route("/history", get(history))
}

/// GET /users/:id/reports/daily?date=YYYY-MM-DD
#[utoipa::path(
    get,
    path = "/users/{id}/reports/daily",
    tag = "reports",
    params(("id" = i64, Path, description = "User id"), DateQuery),
    responses(
        (status = 200, description = "Meals and total calories for the day", body = DailyReport),
        (status = 400, description = "Missing or malformed date", body = String, content_type = "text/plain"),
        (status = 404, description = "User not found", body = String, content_type = "text/plain")
    )
)]
async fn daily_report(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailyReport>, ApiError> {
    let report = MealService::daily_report(state.users(), state.meals(), user_id, query.date).await?;
    Ok(Json(report))
}

/// GET /users/:id/reports/check-limit?date=YYYY-MM-DD
///
/// `true` when the day's calories are at or below the user's daily intake.
#[utoipa::path(
    get,
    path = "/users/{id}/reports/check-limit",
    tag = "reports",
    params(("id" = i64, Path, description = "User id"), DateQuery),
    responses(
        (status = 200, description = "Whether the day stays within the daily intake", body = bool),
        (status = 400, description = "Missing or malformed date", body = String, content_type = "text/plain"),
        (status = 404, description = "User not found", body = String, content_type = "text/plain")
    )
)]
async fn check_limit(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<DateQuery>,
) -> Result<Json<bool>, ApiError> {
    let within =
        MealService::is_within_daily_limit(state.users(), state.meals(), user_id, query.date)
            .await?;
    Ok(Json(within))
}

/// GET /users/:id/reports/history?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD
#[utoipa::path(
    get,
    path = "/users/{id}/reports/history",
    tag = "reports",
    params(("id" = i64, Path, description = "User id"), HistoryQuery),
    responses(
        (status = 200, description = "One daily report per day, oldest first", body = [DailyReport]),
        (status = 400, description = "Inverted or too long date range", body = String, content_type = "text/plain"),
        (status = 404, description = "User not found", body = String, content_type = "text/plain")
    )
)]
async fn history(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<DailyReport>>, ApiError> {
    let reports = MealService::nutrition_history(
        state.users(),
        state.meals(),
        user_id,
        query.start_date,
        query.end_date,
        state.config().reports.max_history_days,
    )
    .await?;
    Ok(Json(reports))
}
