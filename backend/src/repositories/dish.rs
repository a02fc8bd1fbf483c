//! Dish repository for database operations

use super::DishStore;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

/// Dish record from database
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct DishRecord {
    pub id: i64,
    pub name: String,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    pub meal_id: Option<i64>,
}

/// Input for creating a dish
#[derive(Debug, Clone)]
pub struct CreateDish {
    pub name: String,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    pub meal_id: Option<i64>,
}

/// Postgres-backed dish store
#[derive(Clone)]
pub struct DishRepository {
    pool: PgPool,
}

impl DishRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DishStore for DishRepository {
    async fn find_all(&self) -> Result<Vec<DishRecord>> {
        let records = sqlx::query_as::<_, DishRecord>(
            r#"
            SELECT id, name, calories, proteins, fats, carbohydrates, meal_id
            FROM dishes
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<DishRecord>> {
        let record = sqlx::query_as::<_, DishRecord>(
            r#"
            SELECT id, name, calories, proteins, fats, carbohydrates, meal_id
            FROM dishes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn create(&self, input: CreateDish) -> Result<DishRecord> {
        let record = sqlx::query_as::<_, DishRecord>(
            r#"
            INSERT INTO dishes (name, calories, proteins, fats, carbohydrates, meal_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, calories, proteins, fats, carbohydrates, meal_id
            "#,
        )
        .bind(&input.name)
        .bind(input.calories)
        .bind(input.proteins)
        .bind(input.fats)
        .bind(input.carbohydrates)
        .bind(input.meal_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update(&self, dish: &DishRecord) -> Result<Option<DishRecord>> {
        let record = sqlx::query_as::<_, DishRecord>(
            r#"
            UPDATE dishes
            SET name = $2, calories = $3, proteins = $4, fats = $5, carbohydrates = $6,
                meal_id = $7
            WHERE id = $1
            RETURNING id, name, calories, proteins, fats, carbohydrates, meal_id
            "#,
        )
        .bind(dish.id)
        .bind(&dish.name)
        .bind(dish.calories)
        .bind(dish.proteins)
        .bind(dish.fats)
        .bind(dish.carbohydrates)
        .bind(dish.meal_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM dishes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
