//! Dish service

use crate::error::ApiError;
use crate::metrics;
use crate::repositories::{is_foreign_key_violation, CreateDish, DishRecord, DishStore, MealStore};
use calorie_tracker_shared::patch::{apply_nullable, apply_required};
use calorie_tracker_shared::{CreateDishRequest, DishResponse, UpdateDishRequest};
use tracing::info;

impl From<DishRecord> for DishResponse {
    fn from(record: DishRecord) -> Self {
        DishResponse {
            id: record.id,
            name: record.name,
            calories: record.calories,
            proteins: record.proteins,
            fats: record.fats,
            carbohydrates: record.carbohydrates,
            meal_id: record.meal_id,
        }
    }
}

/// Dish service for business logic
pub struct DishService;

impl DishService {
    pub async fn list(dishes: &dyn DishStore) -> Result<Vec<DishResponse>, ApiError> {
        let records = dishes.find_all().await?;
        Ok(records.into_iter().map(DishResponse::from).collect())
    }

    pub async fn get(dishes: &dyn DishStore, id: i64) -> Result<DishResponse, ApiError> {
        dishes
            .find_by_id(id)
            .await?
            .map(DishResponse::from)
            .ok_or_else(ApiError::dish_not_found)
    }

    /// Create a dish, optionally attached to an existing meal
    pub async fn create(
        dishes: &dyn DishStore,
        meals: &dyn MealStore,
        req: CreateDishRequest,
    ) -> Result<DishResponse, ApiError> {
        let name = req.name.ok_or_else(|| ApiError::missing_field("name"))?;

        if let Some(meal_id) = req.meal_id {
            Self::ensure_meal_exists(meals, meal_id).await?;
        }

        let input = CreateDish {
            name,
            calories: req.calories.unwrap_or_default(),
            proteins: req.proteins.unwrap_or_default(),
            fats: req.fats.unwrap_or_default(),
            carbohydrates: req.carbohydrates.unwrap_or_default(),
            meal_id: req.meal_id,
        };

        let record = dishes.create(input).await.map_err(Self::map_write_error)?;

        info!(dish_id = record.id, meal_id = ?record.meal_id, "Dish created");
        metrics::record_dish_created();

        Ok(record.into())
    }

    /// Apply a partial update; a null `mealId` detaches the dish
    pub async fn update(
        dishes: &dyn DishStore,
        meals: &dyn MealStore,
        id: i64,
        req: UpdateDishRequest,
    ) -> Result<DishResponse, ApiError> {
        let mut dish = dishes
            .find_by_id(id)
            .await?
            .ok_or_else(ApiError::dish_not_found)?;

        if let Some(Some(meal_id)) = req.meal_id {
            Self::ensure_meal_exists(meals, meal_id).await?;
        }

        apply_required(&mut dish.name, req.name);
        apply_required(&mut dish.calories, req.calories);
        apply_required(&mut dish.proteins, req.proteins);
        apply_required(&mut dish.fats, req.fats);
        apply_required(&mut dish.carbohydrates, req.carbohydrates);
        apply_nullable(&mut dish.meal_id, req.meal_id);

        let saved = dishes
            .update(&dish)
            .await
            .map_err(Self::map_write_error)?
            .ok_or_else(ApiError::dish_not_found)?;

        info!(dish_id = id, meal_id = ?saved.meal_id, "Dish updated");
        Ok(saved.into())
    }

    pub async fn delete(dishes: &dyn DishStore, id: i64) -> Result<(), ApiError> {
        if !dishes.delete(id).await? {
            return Err(ApiError::dish_not_found());
        }
        info!(dish_id = id, "Dish deleted");
        Ok(())
    }

    async fn ensure_meal_exists(meals: &dyn MealStore, meal_id: i64) -> Result<(), ApiError> {
        match meals.find_by_id(meal_id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::meal_not_found()),
        }
    }

    /// The meal can disappear between the existence check and the write
    fn map_write_error(err: anyhow::Error) -> ApiError {
        if is_foreign_key_violation(&err) {
            ApiError::meal_not_found()
        } else {
            ApiError::Internal(err)
        }
    }
}
