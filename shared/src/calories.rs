//! Daily calorie goal calculations
//!
//! Derives a user's Basal Metabolic Rate (BMR) and recommended daily calorie
//! intake from body metrics and a weight goal.
//!
//! All functions here are pure; persistence and recomputation policy live in
//! the backend services.

use crate::errors::CalorieError;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

// ============================================================================
// Profile Types
// ============================================================================

/// Gender used by the gender-branched BMR formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// Weight goal that scales BMR into a daily calorie intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Goal {
    WeightLoss,
    Maintenance,
    WeightGain,
}

impl Goal {
    /// Multiplier applied to BMR for this goal
    pub fn multiplier(&self) -> f64 {
        match self {
            Goal::WeightLoss => 0.8,
            Goal::Maintenance => 1.0,
            Goal::WeightGain => 1.2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "WEIGHT_LOSS",
            Goal::Maintenance => "MAINTENANCE",
            Goal::WeightGain => "WEIGHT_GAIN",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "WEIGHT_LOSS" => Ok(Goal::WeightLoss),
            "MAINTENANCE" => Ok(Goal::Maintenance),
            "WEIGHT_GAIN" => Ok(Goal::WeightGain),
            _ => Err(format!("Unknown goal: {}", s)),
        }
    }
}

/// Complete set of BMR inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMetrics {
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Age in years
    pub age_years: i32,
    pub gender: Gender,
}

impl BodyMetrics {
    /// Assemble metrics from optional stored values.
    ///
    /// Fails with [`CalorieError::IncompleteParameters`] naming every missing input.
    pub fn from_parts(
        weight_kg: Option<f64>,
        height_cm: Option<f64>,
        age_years: Option<i32>,
        gender: Option<Gender>,
    ) -> Result<Self, CalorieError> {
        match (weight_kg, height_cm, age_years, gender) {
            (Some(weight_kg), Some(height_cm), Some(age_years), Some(gender)) => Ok(Self {
                weight_kg,
                height_cm,
                age_years,
                gender,
            }),
            _ => {
                let mut missing = Vec::new();
                if weight_kg.is_none() {
                    missing.push("weight");
                }
                if height_cm.is_none() {
                    missing.push("height");
                }
                if age_years.is_none() {
                    missing.push("age");
                }
                if gender.is_none() {
                    missing.push("gender");
                }
                Err(CalorieError::IncompleteParameters(missing))
            }
        }
    }
}

// ============================================================================
// BMR and Daily Intake
// ============================================================================

/// Calculate Basal Metabolic Rate
///
/// Men: BMR = 88.362 + 13.397 × weight(kg) + 4.799 × height(cm) - 5.677 × age(y)
/// Women: BMR = 447.593 + 9.247 × weight(kg) + 3.098 × height(cm) - 4.330 × age(y)
pub fn calculate_bmr(metrics: &BodyMetrics) -> f64 {
    let age = metrics.age_years as f64;
    match metrics.gender {
        Gender::Male => {
            88.362 + 13.397 * metrics.weight_kg + 4.799 * metrics.height_cm - 5.677 * age
        }
        Gender::Female => {
            447.593 + 9.247 * metrics.weight_kg + 3.098 * metrics.height_cm - 4.330 * age
        }
    }
}

/// Scale BMR by the goal multiplier
pub fn calculate_daily_calorie_intake(bmr: f64, goal: Goal) -> f64 {
    bmr * goal.multiplier()
}

/// BMR and goal-adjusted intake from possibly incomplete profile values.
///
/// A missing goal counts as an incomplete parameter.
pub fn daily_calorie_intake_for(
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    age_years: Option<i32>,
    gender: Option<Gender>,
    goal: Option<Goal>,
) -> Result<f64, CalorieError> {
    let metrics = match BodyMetrics::from_parts(weight_kg, height_cm, age_years, gender) {
        Ok(metrics) => metrics,
        Err(CalorieError::IncompleteParameters(mut missing)) => {
            if goal.is_none() {
                missing.push("goal");
            }
            return Err(CalorieError::IncompleteParameters(missing));
        }
    };
    let goal = goal.ok_or_else(|| CalorieError::IncompleteParameters(vec!["goal"]))?;

    Ok(calculate_daily_calorie_intake(calculate_bmr(&metrics), goal))
}

/// Whether a day's total stays within the daily intake (boundary inclusive)
pub fn is_within_daily_limit(total_calories: f64, daily_calorie_intake: f64) -> bool {
    total_calories <= daily_calorie_intake
}
