//! API request and response types

use crate::calories::{Gender, Goal};
use crate::patch::{double_option, is_present, Patch};
use crate::validation::{
    validate_age, validate_email, validate_height, validate_name, validate_nutrient,
    validate_weight, PatchChecks,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

// ============================================================================
// User Types
// ============================================================================

/// User representation returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub daily_calorie_intake: Option<f64>,
    pub gender: Option<Gender>,
    pub goal: Option<Goal>,
    pub meal_ids: Vec<i64>,
}

/// User creation request
///
/// Every field is required; a missing or null one fails with `must not be null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(
        required(message = "must not be null"),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "must not be null"),
        email(message = "must be a well-formed email address")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "must not be null"),
        range(min = 1, max = 100, message = "must be between 1 and 100")
    )]
    pub age: Option<i32>,
    #[validate(
        required(message = "must not be null"),
        range(min = 5.0, message = "must be greater than or equal to 5")
    )]
    pub weight: Option<f64>,
    #[validate(
        required(message = "must not be null"),
        range(min = 30.0, message = "must be greater than or equal to 30")
    )]
    pub height: Option<f64>,
    #[validate(required(message = "must not be null"))]
    pub gender: Option<Gender>,
    #[validate(required(message = "must not be null"))]
    pub goal: Option<Goal>,
}

/// Partial user update; omitted fields keep their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub email: Patch<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i32>)]
    pub age: Patch<i32>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub weight: Patch<f64>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub height: Patch<f64>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Gender>)]
    pub gender: Patch<Gender>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Goal>)]
    pub goal: Patch<Goal>,
}

impl UpdateUserRequest {
    /// Whether any BMR input or the goal appears in the payload
    pub fn touches_body_metrics(&self) -> bool {
        is_present(&self.weight)
            || is_present(&self.height)
            || is_present(&self.age)
            || is_present(&self.gender)
            || is_present(&self.goal)
    }
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        PatchChecks::default()
            .required("name", &self.name, |v| validate_name(v))
            .required("email", &self.email, |v| validate_email(v))
            .required("age", &self.age, |v| validate_age(*v))
            .nullable("weight", &self.weight, |v| validate_weight(*v))
            .nullable("height", &self.height, |v| validate_height(*v))
            .finish()
    }
}

// ============================================================================
// Dish Types
// ============================================================================

/// Dish representation returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DishResponse {
    pub id: i64,
    pub name: String,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    pub meal_id: Option<i64>,
}

/// Dish creation request; nutrients default to 0 when omitted or null
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDishRequest {
    #[validate(
        required(message = "must not be null"),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: Option<String>,
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub calories: Option<f64>,
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub proteins: Option<f64>,
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub fats: Option<f64>,
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub carbohydrates: Option<f64>,
    /// Meal to attach the dish to; `None` leaves it unattached
    pub meal_id: Option<i64>,
}

/// Partial dish update; null `mealId` detaches the dish
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDishRequest {
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub calories: Patch<f64>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub proteins: Patch<f64>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub fats: Patch<f64>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub carbohydrates: Patch<f64>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i64>)]
    pub meal_id: Patch<i64>,
}

impl Validate for UpdateDishRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        PatchChecks::default()
            .required("name", &self.name, |v| validate_name(v))
            .required("calories", &self.calories, |v| validate_nutrient(*v))
            .required("proteins", &self.proteins, |v| validate_nutrient(*v))
            .required("fats", &self.fats, |v| validate_nutrient(*v))
            .required("carbohydrates", &self.carbohydrates, |v| validate_nutrient(*v))
            .finish()
    }
}

// ============================================================================
// Meal Types
// ============================================================================

/// Meal representation returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MealResponse {
    pub id: i64,
    pub created_at: NaiveDate,
    pub user_id: i64,
    pub dish_ids: Vec<i64>,
}

/// Meal creation request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    #[validate(required(message = "must not be null"))]
    pub user_id: Option<i64>,
    /// Existing dishes to attach to the new meal
    pub dish_ids: Option<Vec<i64>>,
}

// ============================================================================
// Report Types
// ============================================================================

/// Meals eaten on one calendar day and their total calories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub date: NaiveDate,
    pub meals: Vec<MealResponse>,
    pub total_calories: f64,
}

/// `?date=YYYY-MM-DD`
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateQuery {
    pub date: NaiveDate,
}

/// `?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD`
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
