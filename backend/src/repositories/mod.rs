//! Data access layer
//!
//! Services talk to storage through the [`UserStore`], [`MealStore`] and
//! [`DishStore`] traits. Postgres repositories back them in production and
//! [`MemoryStore`] backs them in tests and `database.backend = "memory"`.

pub mod dish;
pub mod meal;
pub mod memory;
pub mod user;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

pub use dish::{CreateDish, DishRecord, DishRepository};
pub use meal::{CreateMeal, MealRecord, MealRepository};
pub use memory::MemoryStore;
pub use user::{CreateUser, UserRecord, UserRepository};

/// User persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<UserRecord>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>>;

    /// Whether another user (other than `exclude_id`) already has this email
    async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> Result<bool>;

    async fn create(&self, input: CreateUser) -> Result<UserRecord>;

    /// Save every column of an existing user; `None` if the row is gone
    async fn update(&self, user: &UserRecord) -> Result<Option<UserRecord>>;

    /// Delete a user and their meals; `false` if no such user
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// Meal persistence and the per-day report queries
#[async_trait]
pub trait MealStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<MealRecord>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<MealRecord>>;

    async fn find_by_user_and_date(&self, user_id: i64, date: NaiveDate)
        -> Result<Vec<MealRecord>>;

    /// Sum of dish calories over the user's meals on `date`, 0 when there are none
    async fn total_calories_by_user_and_date(&self, user_id: i64, date: NaiveDate) -> Result<f64>;

    /// Insert a meal and attach the listed dishes in one step
    async fn create(&self, input: CreateMeal) -> Result<MealRecord>;

    /// Delete a meal, detaching its dishes; `false` if no such meal
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// Dish persistence
#[async_trait]
pub trait DishStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<DishRecord>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<DishRecord>>;

    async fn create(&self, input: CreateDish) -> Result<DishRecord>;

    async fn update(&self, dish: &DishRecord) -> Result<Option<DishRecord>>;

    async fn delete(&self, id: i64) -> Result<bool>;
}

/// Whether a store error is a Postgres unique constraint violation
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

/// Whether a store error is a Postgres foreign key violation
pub fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|db| db.is_foreign_key_violation())
        .unwrap_or(false)
}
