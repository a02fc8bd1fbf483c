//! Prometheus metrics
//!
//! Counters are recorded through the `metrics` facade and are no-ops until
//! [`install_recorder`] has run.

use anyhow::Result;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const USERS_CREATED: &str = "calorie_tracker_users_created_total";
pub const MEALS_CREATED: &str = "calorie_tracker_meals_created_total";
pub const DISHES_CREATED: &str = "calorie_tracker_dishes_created_total";
pub const REPORTS_GENERATED: &str = "calorie_tracker_reports_generated_total";
pub const LIMIT_CHECKS: &str = "calorie_tracker_limit_checks_total";

/// Install the global Prometheus recorder and register counter descriptions
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(USERS_CREATED, "Users created");
    describe_counter!(MEALS_CREATED, "Meals created");
    describe_counter!(DISHES_CREATED, "Dishes created");
    describe_counter!(REPORTS_GENERATED, "Daily reports generated, history days included");
    describe_counter!(LIMIT_CHECKS, "Daily limit checks by outcome");

    Ok(handle)
}

pub fn record_user_created() {
    counter!(USERS_CREATED).increment(1);
}

pub fn record_meal_created() {
    counter!(MEALS_CREATED).increment(1);
}

pub fn record_dish_created() {
    counter!(DISHES_CREATED).increment(1);
}

pub fn record_reports_generated(count: usize) {
    counter!(REPORTS_GENERATED).increment(count as u64);
}

pub fn record_limit_check(within_limit: bool) {
    let outcome = if within_limit { "within" } else { "exceeded" };
    counter!(LIMIT_CHECKS, "outcome" => outcome).increment(1);
}
