//! Profile record model and the running-total updates applied to it.

use serde::{Deserialize, Serialize};

use crate::errors::TrackerError;
use crate::goals::{food_effect, workout_effect, WorkoutEffect, WorkoutKind};

/// One user's stored goals, settings and running totals
///
/// `water_curr` and `calorie_curr` hold what is still *remaining* for the
/// day. They are never clamped, so over-consumption shows up as a negative
/// value and workout water credit can push `water_curr` above the goal.
/// An update that would overflow a total fails with
/// [`TrackerError::OutOfRange`] and leaves the record unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub weight: f64,
    pub height: f64,
    pub age: i64,
    pub activity: i64,
    pub city: String,
    pub temperature: f64,
    pub water_goal: i64,
    pub water_curr: i64,
    pub calorie_goal: i64,
    pub calorie_curr: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calorie_burned: Option<i64>,
}

impl Profile {
    /// Water drunk so far today
    pub fn water_consumed(&self) -> i64 {
        self.water_goal.saturating_sub(self.water_curr)
    }

    /// Calories eaten so far today, net of workout credit
    pub fn calories_consumed(&self) -> i64 {
        self.calorie_goal.saturating_sub(self.calorie_curr)
    }

    pub fn calories_burned(&self) -> i64 {
        self.calorie_burned.unwrap_or(0)
    }

    /// Restore the daily totals to their goals
    pub fn reset(&mut self) {
        self.water_curr = self.water_goal;
        self.calorie_curr = self.calorie_goal;
        self.calorie_burned = Some(0);
    }

    pub fn log_water(&mut self, amount_ml: i64) -> Result<(), TrackerError> {
        self.water_curr = self
            .water_curr
            .checked_sub(amount_ml)
            .ok_or(TrackerError::OutOfRange("water amount"))?;
        Ok(())
    }

    /// Subtract a meal from the remaining calories, returning the kcal eaten
    pub fn log_food(&mut self, calories_per_100g: f64, grams: i64) -> Result<i64, TrackerError> {
        let consumed = food_effect(calories_per_100g, grams)
            .ok_or(TrackerError::OutOfRange("grams"))?;
        self.calorie_curr = self
            .calorie_curr
            .checked_sub(consumed)
            .ok_or(TrackerError::OutOfRange("grams"))?;
        Ok(consumed)
    }

    /// Credit a workout: burned calories become edible again and extra water is due
    pub fn log_workout(
        &mut self,
        kind: WorkoutKind,
        minutes: i64,
    ) -> Result<WorkoutEffect, TrackerError> {
        let effect =
            workout_effect(kind, minutes).ok_or(TrackerError::OutOfRange("minutes"))?;

        let totals = (
            self.calories_burned().checked_add(effect.burned_kcal),
            self.calorie_curr.checked_add(effect.burned_kcal),
            self.water_curr.checked_add(effect.water_bonus_ml),
        );
        let (Some(burned), Some(calorie_curr), Some(water_curr)) = totals else {
            return Err(TrackerError::OutOfRange("minutes"));
        };

        self.calorie_burned = Some(burned);
        self.calorie_curr = calorie_curr;
        self.water_curr = water_curr;
        Ok(effect)
    }
}
