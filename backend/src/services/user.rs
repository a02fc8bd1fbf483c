//! User service
//!
//! Owns the derived `dailyCalorieIntake`: it is computed on create and
//! recomputed on any update that touches weight, height, age, gender or goal.

use crate::error::ApiError;
use crate::metrics;
use crate::repositories::{is_unique_violation, CreateUser, UserRecord, UserStore};
use calorie_tracker_shared::patch::{apply_nullable, apply_required};
use calorie_tracker_shared::{
    daily_calorie_intake_for, CreateUserRequest, UpdateUserRequest, UserResponse,
};
use tracing::{debug, info};

impl From<UserRecord> for UserResponse {
    fn from(record: UserRecord) -> Self {
        let gender = record.gender();
        let goal = record.goal();
        UserResponse {
            id: record.id,
            name: record.name,
            email: record.email,
            age: record.age,
            weight: record.weight,
            height: record.height,
            daily_calorie_intake: record.daily_calorie_intake,
            gender,
            goal,
            meal_ids: record.meal_ids,
        }
    }
}

/// User service for business logic
pub struct UserService;

impl UserService {
    pub async fn list(users: &dyn UserStore) -> Result<Vec<UserResponse>, ApiError> {
        let records = users.find_all().await?;
        Ok(records.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get(users: &dyn UserStore, id: i64) -> Result<UserResponse, ApiError> {
        Ok(Self::find(users, id).await?.into())
    }

    /// Stored user or NotFound
    pub async fn find(users: &dyn UserStore, id: i64) -> Result<UserRecord, ApiError> {
        users
            .find_by_id(id)
            .await?
            .ok_or_else(ApiError::user_not_found)
    }

    /// Create a user with a freshly computed daily calorie intake
    pub async fn create(
        users: &dyn UserStore,
        req: CreateUserRequest,
    ) -> Result<UserResponse, ApiError> {
        let name = req.name.ok_or_else(|| ApiError::missing_field("name"))?;
        let email = req.email.ok_or_else(|| ApiError::missing_field("email"))?;
        let age = req.age.ok_or_else(|| ApiError::missing_field("age"))?;
        let weight = req.weight.ok_or_else(|| ApiError::missing_field("weight"))?;
        let height = req.height.ok_or_else(|| ApiError::missing_field("height"))?;
        let gender = req.gender.ok_or_else(|| ApiError::missing_field("gender"))?;
        let goal = req.goal.ok_or_else(|| ApiError::missing_field("goal"))?;

        Self::ensure_email_free(users, &email, None).await?;

        let intake = daily_calorie_intake_for(
            Some(weight),
            Some(height),
            Some(age),
            Some(gender),
            Some(goal),
        )?;

        let input = CreateUser {
            name,
            email,
            age,
            weight,
            height,
            gender,
            goal,
            daily_calorie_intake: intake,
        };

        let record = users.create(input).await.map_err(Self::map_write_error)?;

        info!(user_id = record.id, daily_calorie_intake = intake, "User created");
        metrics::record_user_created();

        Ok(record.into())
    }

    /// Apply a partial update.
    ///
    /// The intake is recomputed only when the payload touches a BMR input or
    /// the goal; otherwise the stored value is kept as is.
    pub async fn update(
        users: &dyn UserStore,
        id: i64,
        req: UpdateUserRequest,
    ) -> Result<UserResponse, ApiError> {
        let mut user = Self::find(users, id).await?;

        if let Some(Some(email)) = &req.email {
            if *email != user.email {
                Self::ensure_email_free(users, email, Some(id)).await?;
            }
        }

        let recompute = req.touches_body_metrics();
        Self::merge(&mut user, req);

        if recompute {
            let intake = daily_calorie_intake_for(
                user.weight,
                user.height,
                Some(user.age),
                user.gender(),
                user.goal(),
            )?;
            debug!(user_id = id, daily_calorie_intake = intake, "Recomputed calorie intake");
            user.daily_calorie_intake = Some(intake);
        }

        let saved = users
            .update(&user)
            .await
            .map_err(Self::map_write_error)?
            .ok_or_else(ApiError::user_not_found)?;

        info!(user_id = id, recomputed = recompute, "User updated");
        Ok(saved.into())
    }

    pub async fn delete(users: &dyn UserStore, id: i64) -> Result<(), ApiError> {
        if !users.delete(id).await? {
            return Err(ApiError::user_not_found());
        }
        info!(user_id = id, "User deleted");
        Ok(())
    }

    fn merge(user: &mut UserRecord, req: UpdateUserRequest) {
        apply_required(&mut user.name, req.name);
        apply_required(&mut user.email, req.email);
        apply_required(&mut user.age, req.age);
        apply_nullable(&mut user.weight, req.weight);
        apply_nullable(&mut user.height, req.height);

        if let Some(gender) = req.gender {
            user.set_gender(gender);
        }
        if let Some(goal) = req.goal {
            user.set_goal(goal);
        }
    }

    async fn ensure_email_free(
        users: &dyn UserStore,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<(), ApiError> {
        if users.email_exists(email, exclude_id).await? {
            return Err(Self::email_taken());
        }
        Ok(())
    }

    fn email_taken() -> ApiError {
        ApiError::Conflict("Email is already in use".to_string())
    }

    /// A concurrent insert can still trip the unique index after the pre-check
    fn map_write_error(err: anyhow::Error) -> ApiError {
        if is_unique_violation(&err) {
            Self::email_taken()
        } else {
            ApiError::Internal(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;
    use axum::http::StatusCode;
    use calorie_tracker_shared::{Gender, Goal};
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static SEQ: AtomicUsize = AtomicUsize::new(0);

    fn create_request(goal: Goal) -> CreateUserRequest {
        let email: String = SafeEmail().fake();
        CreateUserRequest {
            name: Some(Name().fake()),
            email: Some(format!("{}{}", SEQ.fetch_add(1, Ordering::Relaxed), email)),
            age: Some(22),
            weight: Some(72.3),
            height: Some(171.0),
            gender: Some(Gender::Male),
            goal: Some(goal),
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    fn patch(json: &str) -> UpdateUserRequest {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_create_computes_weight_gain_intake() {
        let store = MemoryStore::new();
        let user = UserService::create(&store, create_request(Goal::WeightGain))
            .await
            .unwrap();

        // 88.362 + 13.397*72.3 + 4.799*171 - 5.677*22 = 1752.7001
        assert_close(user.daily_calorie_intake.unwrap(), 1752.7001 * 1.2);
        assert_eq!(user.goal, Some(Goal::WeightGain));
        assert!(user.meal_ids.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let store = MemoryStore::new();
        let first = create_request(Goal::Maintenance);
        let mut second = create_request(Goal::Maintenance);
        second.email = first.email.clone();

        UserService::create(&store, first).await.unwrap();
        let err = UserService::create(&store, second).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_without_goal_names_the_field() {
        let store = MemoryStore::new();
        let mut req = create_request(Goal::Maintenance);
        req.goal = None;

        let err = UserService::create(&store, req).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "\"goal\" - must not be null");
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_name_keeps_stale_intake() {
        let store = MemoryStore::new();
        let user = UserService::create(&store, create_request(Goal::Maintenance))
            .await
            .unwrap();

        let updated = UserService::update(&store, user.id, patch(r#"{"name":"Petr"}"#))
            .await
            .unwrap();

        assert_eq!(updated.name, "Petr");
        assert_eq!(updated.email, user.email);
        assert_eq!(updated.daily_calorie_intake, user.daily_calorie_intake);
    }

    #[tokio::test]
    async fn test_update_weight_recomputes_intake() {
        let store = MemoryStore::new();
        let user = UserService::create(&store, create_request(Goal::Maintenance))
            .await
            .unwrap();

        let updated = UserService::update(&store, user.id, patch(r#"{"weight":80.0}"#))
            .await
            .unwrap();

        let expected = 88.362 + 13.397 * 80.0 + 4.799 * 171.0 - 5.677 * 22.0;
        assert_close(updated.daily_calorie_intake.unwrap(), expected);
        assert_eq!(updated.name, user.name);
        assert_eq!(updated.height, Some(171.0));
    }

    #[tokio::test]
    async fn test_update_goal_rescales_intake() {
        let store = MemoryStore::new();
        let user = UserService::create(&store, create_request(Goal::Maintenance))
            .await
            .unwrap();

        let updated = UserService::update(&store, user.id, patch(r#"{"goal":"WEIGHT_LOSS"}"#))
            .await
            .unwrap();

        assert_close(
            updated.daily_calorie_intake.unwrap(),
            user.daily_calorie_intake.unwrap() * 0.8,
        );
    }

    #[tokio::test]
    async fn test_clearing_height_is_incomplete_and_not_saved() {
        let store = MemoryStore::new();
        let user = UserService::create(&store, create_request(Goal::Maintenance))
            .await
            .unwrap();

        let err = UserService::update(&store, user.id, patch(r#"{"height":null}"#))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("height"));

        let stored = UserService::get(&store, user.id).await.unwrap();
        assert_eq!(stored.height, Some(171.0));
    }

    #[tokio::test]
    async fn test_update_to_taken_email_conflicts() {
        let store = MemoryStore::new();
        let first = UserService::create(&store, create_request(Goal::Maintenance))
            .await
            .unwrap();
        let second = UserService::create(&store, create_request(Goal::Maintenance))
            .await
            .unwrap();

        let body = format!(r#"{{"email":"{}"}}"#, first.email);
        let err = UserService::update(&store, second.id, patch(&body))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        // keeping your own email is fine
        let body = format!(r#"{{"email":"{}"}}"#, second.email);
        assert!(UserService::update(&store, second.id, patch(&body)).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let store = MemoryStore::new();

        let err = UserService::get(&store, 7).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = UserService::update(&store, 7, patch("{}")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = UserService::delete(&store, 7).await.unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }
}
