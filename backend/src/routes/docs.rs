//! OpenAPI description of the resource endpoints
//!
//! Served as JSON at `/api-docs/openapi.json`.

use super::{dishes, meals, reports, users};
use axum::Json;
use calorie_tracker_shared::{
    CreateDishRequest, CreateMealRequest, CreateUserRequest, DailyReport, DishResponse, Gender,
    Goal, MealResponse, UpdateDishRequest, UpdateUserRequest, UserResponse,
};
use utoipa::OpenApi;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Calorie Tracker API",
        description = "Users, meals and dishes with daily calorie reports"
    ),
    paths(
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        dishes::list_dishes,
        dishes::get_dish,
        dishes::create_dish,
        dishes::update_dish,
        dishes::delete_dish,
        meals::list_meals,
        meals::get_meal,
        meals::create_meal,
        meals::delete_meal,
        reports::daily_report,
        reports::check_limit,
        reports::history,
    ),
    components(schemas(
        Gender,
        Goal,
        UserResponse,
        CreateUserRequest,
        UpdateUserRequest,
        DishResponse,
        CreateDishRequest,
        UpdateDishRequest,
        MealResponse,
        CreateMealRequest,
        DailyReport,
    )),
    tags(
        (name = "users", description = "User profiles and their daily calorie intake"),
        (name = "dishes", description = "Dishes and their nutrients"),
        (name = "meals", description = "Meals grouping dishes on a calendar day"),
        (name = "reports", description = "Daily reports, limit checks and history"),
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_resource_path() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/users",
            "/users/{id}",
            "/dishes",
            "/dishes/{id}",
            "/meals",
            "/meals/{id}",
            "/users/{id}/reports/daily",
            "/users/{id}/reports/check-limit",
            "/users/{id}/reports/history",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_document_registers_request_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.unwrap().schemas;

        assert!(schemas.contains_key("CreateUserRequest"));
        assert!(schemas.contains_key("UpdateDishRequest"));
        assert!(schemas.contains_key("Goal"));
    }
}
