//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the store traits in [`crate::repositories`].

pub mod dish;
pub mod meal;
pub mod user;

pub use dish::DishService;
pub use meal::MealService;
pub use user::UserService;
