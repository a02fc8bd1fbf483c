//! In-memory store
//!
//! Implements every store trait over shared maps guarded by a tokio
//! `RwLock`. Foreign-key behavior mirrors the Postgres schema: deleting a
//! user removes their meals, deleting a meal detaches its dishes.

use super::{
    CreateDish, CreateMeal, CreateUser, DishRecord, DishStore, MealRecord, MealStore, UserRecord,
    UserStore,
};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredMeal {
    user_id: i64,
    created_at: NaiveDate,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, UserRecord>,
    meals: BTreeMap<i64, StoredMeal>,
    dishes: BTreeMap<i64, DishRecord>,
    next_user_id: i64,
    next_meal_id: i64,
    next_dish_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn meal_ids_of(&self, user_id: i64) -> Vec<i64> {
        self.meals
            .iter()
            .filter(|(_, meal)| meal.user_id == user_id)
            .map(|(id, _)| *id)
            .collect()
    }

    fn dish_ids_of(&self, meal_id: i64) -> Vec<i64> {
        self.dishes
            .values()
            .filter(|dish| dish.meal_id == Some(meal_id))
            .map(|dish| dish.id)
            .collect()
    }

    fn user(&self, id: i64) -> Option<UserRecord> {
        self.users.get(&id).map(|user| UserRecord {
            meal_ids: self.meal_ids_of(id),
            ..user.clone()
        })
    }

    fn meal(&self, id: i64) -> Option<MealRecord> {
        self.meals.get(&id).map(|meal| MealRecord {
            id,
            user_id: meal.user_id,
            created_at: meal.created_at,
            dish_ids: self.dish_ids_of(id),
        })
    }

    fn remove_meal(&mut self, id: i64) -> bool {
        if self.meals.remove(&id).is_none() {
            return false;
        }
        for dish in self.dishes.values_mut() {
            if dish.meal_id == Some(id) {
                dish.meal_id = None;
            }
        }
        true
    }
}

/// Process-local store used by tests and the `memory` backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<UserRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.users.keys().filter_map(|id| tables.user(*id)).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        Ok(self.tables.read().await.user(id))
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .any(|user| user.email == email && Some(user.id) != exclude_id))
    }

    async fn create(&self, input: CreateUser) -> Result<UserRecord> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|user| user.email == input.email) {
            bail!("duplicate email: {}", input.email);
        }

        let id = Tables::next_id(&mut tables.next_user_id);
        let record = UserRecord {
            id,
            name: input.name,
            email: input.email,
            age: input.age,
            weight: Some(input.weight),
            height: Some(input.height),
            gender: Some(input.gender.as_str().to_string()),
            goal: Some(input.goal.as_str().to_string()),
            daily_calorie_intake: Some(input.daily_calorie_intake),
            meal_ids: Vec::new(),
        };
        tables.users.insert(id, record.clone());

        Ok(record)
    }

    async fn update(&self, user: &UserRecord) -> Result<Option<UserRecord>> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Ok(None);
        }
        if tables
            .users
            .values()
            .any(|other| other.id != user.id && other.email == user.email)
        {
            bail!("duplicate email: {}", user.email);
        }

        tables.users.insert(user.id, user.clone());
        Ok(tables.user(user.id))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        for meal_id in tables.meal_ids_of(id) {
            tables.remove_meal(meal_id);
        }
        Ok(true)
    }
}

#[async_trait]
impl MealStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<MealRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.meals.keys().filter_map(|id| tables.meal(*id)).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<MealRecord>> {
        Ok(self.tables.read().await.meal(id))
    }

    async fn find_by_user_and_date(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<MealRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .meals
            .iter()
            .filter(|(_, meal)| meal.user_id == user_id && meal.created_at == date)
            .filter_map(|(id, _)| tables.meal(*id))
            .collect())
    }

    async fn total_calories_by_user_and_date(&self, user_id: i64, date: NaiveDate) -> Result<f64> {
        let tables = self.tables.read().await;
        let total = tables
            .dishes
            .values()
            .filter(|dish| {
                dish.meal_id
                    .and_then(|meal_id| tables.meals.get(&meal_id))
                    .map(|meal| meal.user_id == user_id && meal.created_at == date)
                    .unwrap_or(false)
            })
            .map(|dish| dish.calories)
            .sum();

        Ok(total)
    }

    async fn create(&self, input: CreateMeal) -> Result<MealRecord> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&input.user_id) {
            bail!("meal references missing user {}", input.user_id);
        }

        let id = Tables::next_id(&mut tables.next_meal_id);
        tables.meals.insert(
            id,
            StoredMeal {
                user_id: input.user_id,
                created_at: input.created_at,
            },
        );
        for dish_id in &input.dish_ids {
            if let Some(dish) = tables.dishes.get_mut(dish_id) {
                dish.meal_id = Some(id);
            }
        }

        tables
            .meal(id)
            .ok_or_else(|| anyhow::anyhow!("meal {} vanished after insert", id))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.remove_meal(id))
    }
}

#[async_trait]
impl DishStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<DishRecord>> {
        Ok(self.tables.read().await.dishes.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<DishRecord>> {
        Ok(self.tables.read().await.dishes.get(&id).cloned())
    }

    async fn create(&self, input: CreateDish) -> Result<DishRecord> {
        let mut tables = self.tables.write().await;
        if let Some(meal_id) = input.meal_id {
            if !tables.meals.contains_key(&meal_id) {
                bail!("dish references missing meal {}", meal_id);
            }
        }

        let id = Tables::next_id(&mut tables.next_dish_id);
        let record = DishRecord {
            id,
            name: input.name,
            calories: input.calories,
            proteins: input.proteins,
            fats: input.fats,
            carbohydrates: input.carbohydrates,
            meal_id: input.meal_id,
        };
        tables.dishes.insert(id, record.clone());

        Ok(record)
    }

    async fn update(&self, dish: &DishRecord) -> Result<Option<DishRecord>> {
        let mut tables = self.tables.write().await;
        if let Some(meal_id) = dish.meal_id {
            if !tables.meals.contains_key(&meal_id) {
                bail!("dish references missing meal {}", meal_id);
            }
        }

        match tables.dishes.get_mut(&dish.id) {
            Some(stored) => {
                *stored = dish.clone();
                Ok(Some(dish.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.dishes.remove(&id).is_some())
    }
}
