//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.

use crate::config::AppConfig;
use crate::repositories::{
    DishRepository, DishStore, MealRepository, MealStore, MemoryStore, UserRepository, UserStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// All fields are `Arc`s or pool handles, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub meals: Arc<dyn MealStore>,
    pub dishes: Arc<dyn DishStore>,
    /// Database connection pool, absent for the in-memory backend
    pub db: Option<PgPool>,
    /// Prometheus handle used to render `/metrics`
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State backed by Postgres repositories sharing one pool
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            users: Arc::new(UserRepository::new(db.clone())),
            meals: Arc::new(MealRepository::new(db.clone())),
            dishes: Arc::new(DishRepository::new(db.clone())),
            db: Some(db),
            metrics: None,
        }
    }

    /// State backed by a single fresh [`MemoryStore`]
    pub fn in_memory(config: AppConfig) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), config)
    }

    /// State backed by an existing [`MemoryStore`], e.g. one a test has seeded
    pub fn with_store(store: Arc<MemoryStore>, config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            users: store.clone(),
            meals: store.clone(),
            dishes: store,
            db: None,
            metrics: None,
        }
    }

    /// Attach the Prometheus handle rendered at `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    #[inline]
    pub fn meals(&self) -> &dyn MealStore {
        self.meals.as_ref()
    }

    #[inline]
    pub fn dishes(&self) -> &dyn DishStore {
        self.dishes.as_ref()
    }
}
