//! # Goal Calculator Module
//!
//! Pure functions deriving daily water and calorie goals from profile data,
//! plus the effect of a logged workout or meal on the running totals.

use serde::{Deserialize, Serialize};

/// Temperature above which the day counts as hot, in °C
pub const HOT_DAY_THRESHOLD_C: f64 = 25.0;

/// Offset between Kelvin and Celsius
const KELVIN_OFFSET: f64 = 273.15;

/// Kind of workout offered by the workout menu
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkoutKind {
    Cardio,
    Strength,
}

/// Calories burned and extra water prescribed by a workout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkoutEffect {
    pub burned_kcal: i64,
    pub water_bonus_ml: i64,
}

/// Daily water goal in ml
pub fn water_goal(weight_kg: f64, activity_minutes: i64, is_hot: bool) -> i64 {
    let hot = if is_hot { 1.0 } else { 0.0 };
    let activity_blocks = activity_minutes.div_euclid(30) as f64;
    (weight_kg * 30.0 + 500.0 * activity_blocks + 500.0 - 1000.0 * hot).trunc() as i64
}

/// Daily calorie goal in kcal
///
/// The formula has no sex-dependent constant term; it is kept as is.
pub fn calorie_goal(weight_kg: f64, height_cm: f64, age_years: i64) -> i64 {
    (weight_kg * 10.0 + 6.25 * height_cm - 5.0 * age_years as f64).trunc() as i64
}

/// Whether a temperature counts as a hot day
pub fn is_hot(temperature_c: f64) -> bool {
    temperature_c > HOT_DAY_THRESHOLD_C
}

/// Cardio burn and water bonus, `None` when the totals would not fit in an `i64`
pub fn cardio_effect(minutes: i64) -> Option<WorkoutEffect> {
    Some(WorkoutEffect {
        burned_kcal: minutes.checked_mul(10)?,
        water_bonus_ml: minutes.div_euclid(30).checked_mul(200)?,
    })
}

pub fn strength_effect(minutes: i64) -> Option<WorkoutEffect> {
    Some(WorkoutEffect {
        burned_kcal: minutes.checked_mul(5)?,
        water_bonus_ml: minutes.div_euclid(15).checked_mul(200)?,
    })
}

/// Effect of a workout of the given kind
pub fn workout_effect(kind: WorkoutKind, minutes: i64) -> Option<WorkoutEffect> {
    match kind {
        WorkoutKind::Cardio => cardio_effect(minutes),
        WorkoutKind::Strength => strength_effect(minutes),
    }
}

/// Calories consumed when eating `grams` of a product
///
/// `None` when the product of the two is not a finite value inside the `i64` range.
pub fn food_effect(calories_per_100g: f64, grams: i64) -> Option<i64> {
    let kcal = (calories_per_100g / 100.0 * grams as f64).trunc();
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    (kcal.is_finite() && kcal >= i64::MIN as f64 && kcal < i64::MAX as f64).then_some(kcal as i64)
}

/// Convert Kelvin to Celsius, rounded to two decimals
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    ((kelvin - KELVIN_OFFSET) * 100.0).round() / 100.0
}
