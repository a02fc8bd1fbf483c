//! Meal service
//!
//! Provides meal CRUD plus the per-day nutrition reports:
//! - Daily report (meals of one day and their calorie total)
//! - Daily limit check against the user's calorie intake
//! - History of daily reports over an inclusive date range

use crate::error::ApiError;
use crate::metrics;
use crate::repositories::{
    is_foreign_key_violation, CreateMeal, DishStore, MealRecord, MealStore, UserStore,
};
use crate::services::UserService;
use calorie_tracker_shared::dates::days_inclusive;
use calorie_tracker_shared::{
    is_within_daily_limit, CreateMealRequest, DailyReport, MealResponse,
};
use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

impl From<MealRecord> for MealResponse {
    fn from(record: MealRecord) -> Self {
        MealResponse {
            id: record.id,
            created_at: record.created_at,
            user_id: record.user_id,
            dish_ids: record.dish_ids,
        }
    }
}

/// Meal service for business logic
pub struct MealService;

impl MealService {
    pub async fn list(meals: &dyn MealStore) -> Result<Vec<MealResponse>, ApiError> {
        let records = meals.find_all().await?;
        Ok(records.into_iter().map(MealResponse::from).collect())
    }

    pub async fn get(meals: &dyn MealStore, id: i64) -> Result<MealResponse, ApiError> {
        meals
            .find_by_id(id)
            .await?
            .map(MealResponse::from)
            .ok_or_else(ApiError::meal_not_found)
    }

    /// Create a meal dated today (UTC) for an existing user
    pub async fn create(
        users: &dyn UserStore,
        meals: &dyn MealStore,
        dishes: &dyn DishStore,
        req: CreateMealRequest,
    ) -> Result<MealResponse, ApiError> {
        let user_id = req.user_id.ok_or_else(|| ApiError::missing_field("userId"))?;
        UserService::find(users, user_id).await?;

        let mut dish_ids = req.dish_ids.unwrap_or_default();
        dish_ids.sort_unstable();
        dish_ids.dedup();
        for dish_id in &dish_ids {
            if dishes.find_by_id(*dish_id).await?.is_none() {
                return Err(ApiError::dish_not_found());
            }
        }

        let input = CreateMeal {
            user_id,
            created_at: Utc::now().date_naive(),
            dish_ids,
        };

        let record = meals.create(input).await.map_err(|err| {
            if is_foreign_key_violation(&err) {
                ApiError::user_not_found()
            } else {
                ApiError::Internal(err)
            }
        })?;

        info!(
            meal_id = record.id,
            user_id = record.user_id,
            dishes = record.dish_ids.len(),
            "Meal created"
        );
        metrics::record_meal_created();

        Ok(record.into())
    }

    pub async fn delete(meals: &dyn MealStore, id: i64) -> Result<(), ApiError> {
        if !meals.delete(id).await? {
            return Err(ApiError::meal_not_found());
        }
        info!(meal_id = id, "Meal deleted");
        Ok(())
    }

    /// Meals of `date` and their calorie total for an existing user
    pub async fn daily_report(
        users: &dyn UserStore,
        meals: &dyn MealStore,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<DailyReport, ApiError> {
        UserService::find(users, user_id).await?;

        let report = Self::build_report(meals, user_id, date).await?;
        metrics::record_reports_generated(1);

        Ok(report)
    }

    /// Whether the day's total stays within the user's daily calorie intake
    pub async fn is_within_daily_limit(
        users: &dyn UserStore,
        meals: &dyn MealStore,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<bool, ApiError> {
        let user = UserService::find(users, user_id).await?;
        let intake = user.daily_calorie_intake.ok_or_else(|| {
            ApiError::Validation("User has no daily calorie intake to check against".to_string())
        })?;

        let total = meals.total_calories_by_user_and_date(user_id, date).await?;
        let within = is_within_daily_limit(total, intake);

        debug!(user_id, %date, total, intake, within, "Checked daily limit");
        metrics::record_limit_check(within);

        Ok(within)
    }

    /// One daily report per calendar day in `[start, end]`, ascending
    pub async fn nutrition_history(
        users: &dyn UserStore,
        meals: &dyn MealStore,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        max_days: u32,
    ) -> Result<Vec<DailyReport>, ApiError> {
        let days = days_inclusive(start, end, max_days)?;
        UserService::find(users, user_id).await?;

        let mut reports = Vec::with_capacity(days.len());
        for date in days {
            reports.push(Self::build_report(meals, user_id, date).await?);
        }

        info!(user_id, %start, %end, days = reports.len(), "Built nutrition history");
        metrics::record_reports_generated(reports.len());

        Ok(reports)
    }

    async fn build_report(
        meals: &dyn MealStore,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<DailyReport, ApiError> {
        let records = meals.find_by_user_and_date(user_id, date).await?;
        let total_calories = meals.total_calories_by_user_and_date(user_id, date).await?;

        Ok(DailyReport {
            date,
            meals: records.into_iter().map(MealResponse::from).collect(),
            total_calories,
        })
    }
}
