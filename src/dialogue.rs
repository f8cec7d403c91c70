//! Conversation state kept per user while a flow is in progress.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::errors::TrackerError;
use crate::goals::WorkoutKind;
use crate::profile::Profile;

/// Answers collected by the profile setup flow so far
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SetupDraft {
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub age: Option<i64>,
    pub activity: Option<i64>,
    pub city: Option<String>,
    pub temperature: Option<f64>,
    pub water_goal: Option<i64>,
    pub calorie_goal: Option<i64>,
}

impl SetupDraft {
    /// Turn a finished draft into a fresh profile with full daily totals
    pub fn complete(&self) -> Result<Profile, TrackerError> {
        let water_goal = require(self.water_goal, "water_goal")?;
        let calorie_goal = require(self.calorie_goal, "calorie_goal")?;

        Ok(Profile {
            weight: require(self.weight, "weight")?,
            height: require(self.height, "height")?,
            age: require(self.age, "age")?,
            activity: require(self.activity, "activity")?,
            city: require(self.city.clone(), "city")?,
            temperature: require(self.temperature, "temperature")?,
            water_goal,
            water_curr: water_goal,
            calorie_goal,
            calorie_curr: calorie_goal,
            calorie_burned: None,
        })
    }
}

/// Unwrap a draft field that an earlier setup step must have filled
pub fn require<T>(value: Option<T>, field: &'static str) -> Result<T, TrackerError> {
    value.ok_or(TrackerError::IncompleteSetup(field))
}

/// Represents the conversation state of one user
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingWeight {
        draft: SetupDraft,
    },
    AwaitingHeight {
        draft: SetupDraft,
    },
    AwaitingAge {
        draft: SetupDraft,
    },
    AwaitingActivity {
        draft: SetupDraft,
    },
    AwaitingCity {
        draft: SetupDraft,
    },
    AwaitingWaterGoal {
        draft: SetupDraft,
    },
    AwaitingCalorieGoal {
        draft: SetupDraft,
    },
    AwaitingConfirmation {
        draft: SetupDraft,
    },
    AwaitingGrams {
        calories_per_100g: f64,
    },
    ChoosingWorkout,
    AwaitingWorkoutMinutes {
        kind: WorkoutKind,
    },
}

/// Type alias for the tracker dialogue
pub type TrackerDialogue = Dialogue<ConversationState, InMemStorage<ConversationState>>;

/// Parse a whole number typed by the user
pub fn parse_integer(input: &str, expected: &'static str) -> Result<i64, TrackerError> {
    input
        .trim()
        .parse()
        .map_err(|_| TrackerError::malformed(expected, input))
}

/// Parse a possibly fractional number, accepting a decimal comma
pub fn parse_number(input: &str, expected: &'static str) -> Result<f64, TrackerError> {
    input
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| TrackerError::malformed(expected, input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("150", "grams").unwrap(), 150);
        assert_eq!(parse_integer("  45 ", "minutes").unwrap(), 45);
        assert_eq!(parse_integer("-200", "water").unwrap(), -200);

        assert!(parse_integer("", "grams").is_err());
        assert!(parse_integer("12.5", "grams").is_err());
        assert!(parse_integer("много", "grams").is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("70", "weight").unwrap(), 70.0);
        assert_eq!(parse_number("70,5", "weight").unwrap(), 70.5);
        assert_eq!(parse_number(" 182.3 ", "height").unwrap(), 182.3);

        assert!(parse_number("NaN", "weight").is_err());
        assert!(parse_number("inf", "weight").is_err());
        assert!(parse_number("seventy", "weight").is_err());
    }

    #[test]
    fn test_draft_completion() {
        let draft = SetupDraft {
            weight: Some(70.0),
            height: Some(175.0),
            age: Some(25),
            activity: Some(60),
            city: Some("Dubai".to_string()),
            temperature: Some(30.0),
            water_goal: Some(2600),
            calorie_goal: Some(1668),
        };
        let profile = draft.complete().unwrap();
        assert_eq!(profile.water_curr, 2600);
        assert_eq!(profile.calorie_curr, 1668);
        assert_eq!(profile.calorie_burned, None);

        let partial = SetupDraft {
            calorie_goal: None,
            ..draft
        };
        assert!(matches!(
            partial.complete(),
            Err(TrackerError::IncompleteSetup("calorie_goal"))
        ));
    }

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(ConversationState::default(), ConversationState::Idle);
    }
}
