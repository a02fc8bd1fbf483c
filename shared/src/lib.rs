//! Calorie Tracker Shared Library
//!
//! Domain types, calorie calculations and request validation shared by the
//! backend and its tests.

pub mod calories;
pub mod dates;
pub mod errors;
pub mod patch;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use calories::*;
pub use errors::*;
pub use types::*;
pub use validation::FieldErrors;
