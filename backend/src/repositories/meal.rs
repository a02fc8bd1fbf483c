//! Meal repository for database operations

use super::MealStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

/// Meal record from database
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct MealRecord {
    pub id: i64,
    pub user_id: i64,
    pub created_at: NaiveDate,
    /// Ids of the dishes attached to the meal, ascending
    pub dish_ids: Vec<i64>,
}

/// Input for creating a meal
#[derive(Debug, Clone)]
pub struct CreateMeal {
    pub user_id: i64,
    pub created_at: NaiveDate,
    /// Existing dishes to attach to the new meal
    pub dish_ids: Vec<i64>,
}

/// Postgres-backed meal store
#[derive(Clone)]
pub struct MealRepository {
    pool: PgPool,
}

impl MealRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MealStore for MealRepository {
    async fn find_all(&self) -> Result<Vec<MealRecord>> {
        let records = sqlx::query_as::<_, MealRecord>(
            r#"
            SELECT m.id, m.user_id, m.created_at,
                   ARRAY(SELECT d.id FROM dishes d WHERE d.meal_id = m.id ORDER BY d.id) AS dish_ids
            FROM meals m
            ORDER BY m.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<MealRecord>> {
        let record = sqlx::query_as::<_, MealRecord>(
            r#"
            SELECT m.id, m.user_id, m.created_at,
                   ARRAY(SELECT d.id FROM dishes d WHERE d.meal_id = m.id ORDER BY d.id) AS dish_ids
            FROM meals m
            WHERE m.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_user_and_date(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<MealRecord>> {
        let records = sqlx::query_as::<_, MealRecord>(
            r#"
            SELECT m.id, m.user_id, m.created_at,
                   ARRAY(SELECT d.id FROM dishes d WHERE d.meal_id = m.id ORDER BY d.id) AS dish_ids
            FROM meals m
            WHERE m.user_id = $1 AND m.created_at = $2
            ORDER BY m.id
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn total_calories_by_user_and_date(&self, user_id: i64, date: NaiveDate) -> Result<f64> {
        let total: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(d.calories), 0)::DOUBLE PRECISION
            FROM meals m
            JOIN dishes d ON d.meal_id = m.id
            WHERE m.user_id = $1 AND m.created_at = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn create(&self, input: CreateMeal) -> Result<MealRecord> {
        let mut tx = self.pool.begin().await?;

        let (id, user_id, created_at): (i64, i64, NaiveDate) = sqlx::query_as(
            r#"
            INSERT INTO meals (user_id, created_at)
            VALUES ($1, $2)
            RETURNING id, user_id, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(input.created_at)
        .fetch_one(&mut *tx)
        .await?;

        let dish_ids: Vec<i64> = if input.dish_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_scalar(
                r#"
                UPDATE dishes SET meal_id = $1
                WHERE id = ANY($2)
                RETURNING id
                "#,
            )
            .bind(id)
            .bind(&input.dish_ids)
            .fetch_all(&mut *tx)
            .await?
        };

        tx.commit().await?;

        let mut dish_ids = dish_ids;
        dish_ids.sort_unstable();

        Ok(MealRecord {
            id,
            user_id,
            created_at,
            dish_ids,
        })
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        // dishes are detached through ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM meals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
