//! User repository for database operations

use super::UserStore;
use anyhow::Result;
use async_trait::async_trait;
use calorie_tracker_shared::{Gender, Goal};
use sqlx::PgPool;

/// User record from database
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<String>,
    pub goal: Option<String>,
    pub daily_calorie_intake: Option<f64>,
    /// Ids of the user's meals, ascending
    pub meal_ids: Vec<i64>,
}

impl UserRecord {
    pub fn gender(&self) -> Option<Gender> {
        self.gender.as_deref().and_then(|g| g.parse().ok())
    }

    pub fn goal(&self) -> Option<Goal> {
        self.goal.as_deref().and_then(|g| g.parse().ok())
    }

    pub fn set_gender(&mut self, gender: Option<Gender>) {
        self.gender = gender.map(|g| g.as_str().to_string());
    }

    pub fn set_goal(&mut self, goal: Option<Goal>) {
        self.goal = goal.map(|g| g.as_str().to_string());
    }
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    pub gender: Gender,
    pub goal: Goal,
    pub daily_calorie_intake: f64,
}

/// Postgres-backed user store
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_all(&self) -> Result<Vec<UserRecord>> {
        let records = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT u.id, u.name, u.email, u.age, u.weight, u.height, u.gender, u.goal,
                   u.daily_calorie_intake,
                   ARRAY(SELECT m.id FROM meals m WHERE m.user_id = u.id ORDER BY m.id) AS meal_ids
            FROM users u
            ORDER BY u.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT u.id, u.name, u.email, u.age, u.weight, u.height, u.gender, u.goal,
                   u.daily_calorie_intake,
                   ARRAY(SELECT m.id FROM meals m WHERE m.user_id = u.id ORDER BY m.id) AS meal_ids
            FROM users u
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create(&self, input: CreateUser) -> Result<UserRecord> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, email, age, weight, height, gender, goal, daily_calorie_intake)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, email, age, weight, height, gender, goal, daily_calorie_intake,
                      ARRAY[]::BIGINT[] AS meal_ids
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(input.age)
        .bind(input.weight)
        .bind(input.height)
        .bind(input.gender.as_str())
        .bind(input.goal.as_str())
        .bind(input.daily_calorie_intake)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update(&self, user: &UserRecord) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET name = $2, email = $3, age = $4, weight = $5, height = $6,
                gender = $7, goal = $8, daily_calorie_intake = $9
            WHERE id = $1
            RETURNING id, name, email, age, weight, height, gender, goal, daily_calorie_intake,
                      ARRAY(SELECT m.id FROM meals m WHERE m.user_id = users.id ORDER BY m.id)
                          AS meal_ids
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .bind(user.weight)
        .bind(user.height)
        .bind(&user.gender)
        .bind(&user.goal)
        .bind(user.daily_calorie_intake)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        // meals go with the user through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserRecord {
        UserRecord {
            id: 1,
            name: "Anna".to_string(),
            email: "anna@example.com".to_string(),
            age: 28,
            weight: Some(60.0),
            height: Some(165.0),
            gender: Some("FEMALE".to_string()),
            goal: Some("MAINTENANCE".to_string()),
            daily_calorie_intake: Some(1400.0),
            meal_ids: vec![],
        }
    }

    #[test]
    fn test_enum_columns_parse() {
        let user = record();
        assert_eq!(user.gender(), Some(Gender::Female));
        assert_eq!(user.goal(), Some(Goal::Maintenance));
    }

    #[test]
    fn test_set_enum_columns() {
        let mut user = record();
        user.set_goal(Some(Goal::WeightGain));
        user.set_gender(None);
        assert_eq!(user.goal.as_deref(), Some("WEIGHT_GAIN"));
        assert_eq!(user.gender(), None);
    }
}
