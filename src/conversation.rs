//! # Conversation Engine
//!
//! Turns one incoming event plus the user's current [`ConversationState`]
//! into the next state and the replies to send. The engine never talks to
//! Telegram itself; the `bot` module feeds it events and applies the
//! resulting [`Outcome`].
//!
//! Commands are handled in any state. Direct commands leave the state alone;
//! `/set_profile`, `/log_food` and `/log_workout` start their flow and drop
//! whatever flow was in progress. Free text is interpreted by the current
//! state, and buttons are only honoured by the state that offered them.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::commands::Command;
use crate::dialogue::{parse_integer, parse_number, require, ConversationState, SetupDraft};
use crate::errors::TrackerError;
use crate::goals::{self, WorkoutKind};
use crate::localization::LocalizationManager;
use crate::lookup::{FoodLookup, WeatherLookup};
use crate::profile::Profile;
use crate::store::ProfileStore;

/// Inline button actions, identified by their callback data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonAction {
    AutoWaterGoal,
    AutoCalorieGoal,
    ConfirmProfile,
}

impl ButtonAction {
    pub fn callback_data(self) -> &'static str {
        match self {
            ButtonAction::AutoWaterGoal => "auto_water",
            ButtonAction::AutoCalorieGoal => "auto_calorie",
            ButtonAction::ConfirmProfile => "accept_info",
        }
    }

    pub fn from_callback_data(data: &str) -> Option<Self> {
        match data {
            "auto_water" => Some(ButtonAction::AutoWaterGoal),
            "auto_calorie" => Some(ButtonAction::AutoCalorieGoal),
            "accept_info" => Some(ButtonAction::ConfirmProfile),
            _ => None,
        }
    }
}

/// Something the user did
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Command(Command),
    Text(String),
    Button(ButtonAction),
}

/// Keyboard attached to a reply, rendered by the bot layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyboard {
    AutoWaterGoal,
    AutoCalorieGoal,
    ConfirmProfile,
    WorkoutTypes,
    Remove,
}

/// One outgoing message
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Result of handling one event
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub state: ConversationState,
    pub replies: Vec<Reply>,
}

impl Outcome {
    fn new(state: ConversationState, replies: Vec<Reply>) -> Self {
        Self { state, replies }
    }
}

/// Long-lived service holding the store, the lookups and the message catalog
pub struct Tracker {
    store: ProfileStore,
    food: Arc<dyn FoodLookup>,
    weather: Arc<dyn WeatherLookup>,
    i18n: Arc<LocalizationManager>,
}

/// Per-event context shared by the handlers
struct Ctx<'a> {
    user_id: &'a str,
    lang: Option<&'a str>,
}

impl Tracker {
    pub fn new(
        store: ProfileStore,
        food: Arc<dyn FoodLookup>,
        weather: Arc<dyn WeatherLookup>,
        i18n: Arc<LocalizationManager>,
    ) -> Self {
        Self {
            store,
            food,
            weather,
            i18n,
        }
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn localization(&self) -> &LocalizationManager {
        &self.i18n
    }

    /// Handle one event for a user
    ///
    /// Failures are turned into replies here; the caller only has to store
    /// the returned state and send the replies.
    pub async fn handle(
        &self,
        user_id: &str,
        language_code: Option<&str>,
        state: ConversationState,
        event: Event,
    ) -> Outcome {
        let ctx = Ctx {
            user_id,
            lang: language_code,
        };
        let is_command = matches!(event, Event::Command(_));

        let result = match event {
            Event::Command(command) => self.handle_command(&ctx, state.clone(), command).await,
            Event::Text(text) => self.handle_text(&ctx, state.clone(), &text).await,
            Event::Button(action) => self.handle_button(&ctx, state.clone(), action).await,
        };

        match result {
            Ok(outcome) => {
                if outcome.state != state {
                    debug!(
                        user_id = %user_id,
                        from = ?state,
                        to = ?outcome.state,
                        "Conversation state changed"
                    );
                }
                outcome
            }
            Err(e) => self.recover(&ctx, state, is_command, e),
        }
    }

    /// Map a failed event onto replies and the state to continue from
    fn recover(
        &self,
        ctx: &Ctx<'_>,
        state: ConversationState,
        is_command: bool,
        err: TrackerError,
    ) -> Outcome {
        match err {
            TrackerError::NotFound(_) => {
                info!(user_id = %ctx.user_id, "Profile not found");
                // A sub-flow cannot finish without a profile, a direct command just reports it
                let next = if is_command { state } else { ConversationState::Idle };
                Outcome::new(next, self.missing_profile_replies(ctx))
            }
            TrackerError::MalformedInput { expected, input } => {
                debug!(
                    user_id = %ctx.user_id,
                    expected,
                    input = %input,
                    "Rejected malformed input"
                );
                let mut replies = vec![Reply::text(self.t(ctx, "error-not-a-number"))];
                replies.extend(self.prompt_for(ctx, &state));
                Outcome::new(state, replies)
            }
            TrackerError::OutOfRange(field) => {
                warn!(user_id = %ctx.user_id, field, "Rejected out-of-range value");
                let mut replies = vec![Reply::text(self.t(ctx, "error-out-of-range"))];
                replies.extend(self.prompt_for(ctx, &state));
                Outcome::new(state, replies)
            }
            TrackerError::Storage(e) => {
                error!(user_id = %ctx.user_id, error = %e, "Failed to write profile file");
                Outcome::new(state, vec![Reply::text(self.t(ctx, "error-storage"))])
            }
            e @ (TrackerError::IncompleteSetup(_) | TrackerError::LookupFailed(_)) => {
                error!(
                    user_id = %ctx.user_id,
                    error = %e,
                    "Conversation reached an inconsistent state"
                );
                Outcome::new(
                    ConversationState::Idle,
                    vec![Reply::text(self.t(ctx, "error-internal"))],
                )
            }
        }
    }

    async fn handle_command(
        &self,
        ctx: &Ctx<'_>,
        state: ConversationState,
        command: Command,
    ) -> Result<Outcome, TrackerError> {
        info!(user_id = %ctx.user_id, command = ?command, "Handling command");

        match command {
            Command::Start => Ok(Outcome::new(state, vec![Reply::text(self.t(ctx, "welcome"))])),
            Command::Help => Ok(Outcome::new(state, vec![Reply::text(self.t(ctx, "help-text"))])),
            Command::SetProfile => Ok(Outcome::new(
                ConversationState::AwaitingWeight {
                    draft: SetupDraft::default(),
                },
                vec![Reply::with_keyboard(self.t(ctx, "setup-ask-weight"), Keyboard::Remove)],
            )),
            Command::ShowProfile => {
                let profile = self.store.get(ctx.user_id).await?;
                Ok(Outcome::new(state, vec![Reply::text(self.profile_summary(ctx, &profile))]))
            }
            Command::Reset => {
                self.store
                    .update(ctx.user_id, |profile| {
                        profile.reset();
                        Ok(())
                    })
                    .await?;
                Ok(Outcome::new(state, vec![Reply::text(self.t(ctx, "reset-done"))]))
            }
            Command::LogWater(args) => self.log_water(ctx, state, &args).await,
            Command::LogFood(args) => self.start_food_log(ctx, state, &args).await,
            Command::LogWorkout => Ok(Outcome::new(
                ConversationState::ChoosingWorkout,
                vec![Reply::with_keyboard(self.t(ctx, "workout-choose"), Keyboard::WorkoutTypes)],
            )),
            Command::CheckProgress => {
                let profile = self.store.get(ctx.user_id).await?;
                Ok(Outcome::new(state, vec![Reply::text(self.progress_report(ctx, &profile))]))
            }
        }
    }

    async fn handle_text(
        &self,
        ctx: &Ctx<'_>,
        state: ConversationState,
        text: &str,
    ) -> Result<Outcome, TrackerError> {
        match state {
            ConversationState::Idle => match self.workout_kind_from_label(text) {
                Some(kind) => Ok(self.choose_workout(ctx, kind)),
                None => Ok(Outcome::new(state, vec![Reply::text(self.t(ctx, "text-fallback"))])),
            },
            ConversationState::AwaitingWeight { mut draft } => {
                draft.weight = Some(parse_number(text, "weight")?);
                Ok(self.ask(ctx, ConversationState::AwaitingHeight { draft }, "setup-ask-height"))
            }
            ConversationState::AwaitingHeight { mut draft } => {
                draft.height = Some(parse_number(text, "height")?);
                Ok(self.ask(ctx, ConversationState::AwaitingAge { draft }, "setup-ask-age"))
            }
            ConversationState::AwaitingAge { mut draft } => {
                draft.age = Some(parse_integer(text, "age")?);
                let next = ConversationState::AwaitingActivity { draft };
                Ok(self.ask(ctx, next, "setup-ask-activity"))
            }
            ConversationState::AwaitingActivity { mut draft } => {
                draft.activity = Some(parse_integer(text, "activity")?);
                Ok(self.ask(ctx, ConversationState::AwaitingCity { draft }, "setup-ask-city"))
            }
            ConversationState::AwaitingCity { draft } => Ok(self.set_city(ctx, draft, text).await),
            ConversationState::AwaitingWaterGoal { draft } => {
                let goal = parse_integer(text, "water goal")?;
                Ok(self.set_water_goal(ctx, draft, goal, false))
            }
            ConversationState::AwaitingCalorieGoal { draft } => {
                let goal = parse_integer(text, "calorie goal")?;
                Ok(self.set_calorie_goal(ctx, draft, goal, false))
            }
            ConversationState::AwaitingConfirmation { .. } => {
                let replies = self.prompt_for(ctx, &state).into_iter().collect();
                Ok(Outcome::new(state, replies))
            }
            ConversationState::AwaitingGrams { calories_per_100g } => {
                let grams = parse_integer(text, "grams")?;
                self.log_food(ctx, calories_per_100g, grams).await
            }
            ConversationState::ChoosingWorkout => match self.workout_kind_from_label(text) {
                Some(kind) => Ok(self.choose_workout(ctx, kind)),
                None => {
                    let replies = self.prompt_for(ctx, &state).into_iter().collect();
                    Ok(Outcome::new(state, replies))
                }
            },
            ConversationState::AwaitingWorkoutMinutes { kind } => {
                let minutes = parse_integer(text, "minutes")?;
                self.log_workout(ctx, kind, minutes).await
            }
        }
    }

    async fn handle_button(
        &self,
        ctx: &Ctx<'_>,
        state: ConversationState,
        action: ButtonAction,
    ) -> Result<Outcome, TrackerError> {
        match (action, state) {
            (ButtonAction::AutoWaterGoal, ConversationState::AwaitingWaterGoal { draft }) => {
                let weight = require(draft.weight, "weight")?;
                let activity = require(draft.activity, "activity")?;
                let temperature = require(draft.temperature, "temperature")?;
                let goal = goals::water_goal(weight, activity, goals::is_hot(temperature));
                Ok(self.set_water_goal(ctx, draft, goal, true))
            }
            (ButtonAction::AutoCalorieGoal, ConversationState::AwaitingCalorieGoal { draft }) => {
                let weight = require(draft.weight, "weight")?;
                let height = require(draft.height, "height")?;
                let age = require(draft.age, "age")?;
                let goal = goals::calorie_goal(weight, height, age);
                Ok(self.set_calorie_goal(ctx, draft, goal, true))
            }
            (ButtonAction::ConfirmProfile, ConversationState::AwaitingConfirmation { draft }) => {
                let profile = draft.complete()?;
                self.store.replace(ctx.user_id, profile).await?;
                info!(user_id = %ctx.user_id, "Profile setup completed");
                Ok(Outcome::new(
                    ConversationState::Idle,
                    vec![Reply::text(self.t(ctx, "setup-saved"))],
                ))
            }
            (action, state) => {
                debug!(
                    user_id = %ctx.user_id,
                    action = ?action,
                    state = ?state,
                    "Ignoring stale button"
                );
                Ok(Outcome::new(state, Vec::new()))
            }
        }
    }

    async fn set_city(&self, ctx: &Ctx<'_>, mut draft: SetupDraft, text: &str) -> Outcome {
        let city = text.trim();
        match self.weather.temperature(city).await {
            Ok(temperature) => {
                info!(
                    user_id = %ctx.user_id,
                    city = %city,
                    temperature,
                    "City temperature resolved"
                );
                draft.city = Some(city.to_string());
                draft.temperature = Some(temperature);
                let next = ConversationState::AwaitingWaterGoal { draft };
                let replies = self.prompt_for(ctx, &next).into_iter().collect();
                Outcome::new(next, replies)
            }
            Err(e) => {
                warn!(user_id = %ctx.user_id, city = %city, error = %e, "City lookup failed");
                Outcome::new(
                    ConversationState::AwaitingCity { draft },
                    vec![Reply::text(self.t(ctx, "setup-city-not-found"))],
                )
            }
        }
    }

    fn set_water_goal(
        &self,
        ctx: &Ctx<'_>,
        mut draft: SetupDraft,
        goal: i64,
        auto: bool,
    ) -> Outcome {
        draft.water_goal = Some(goal);
        let mut replies = Vec::new();
        if auto {
            replies.push(Reply::text(self.t_args(
                ctx,
                "setup-water-goal-auto",
                &[("goal", &goal.to_string())],
            )));
        }
        let next = ConversationState::AwaitingCalorieGoal { draft };
        replies.extend(self.prompt_for(ctx, &next));
        Outcome::new(next, replies)
    }

    fn set_calorie_goal(
        &self,
        ctx: &Ctx<'_>,
        mut draft: SetupDraft,
        goal: i64,
        auto: bool,
    ) -> Outcome {
        draft.calorie_goal = Some(goal);
        let mut replies = Vec::new();
        if auto {
            replies.push(Reply::text(self.t_args(
                ctx,
                "setup-calorie-goal-auto",
                &[("goal", &goal.to_string())],
            )));
        }
        replies.push(Reply::text(self.draft_summary(ctx, &draft)));
        let next = ConversationState::AwaitingConfirmation { draft };
        replies.extend(self.prompt_for(ctx, &next));
        Outcome::new(next, replies)
    }

    async fn log_water(
        &self,
        ctx: &Ctx<'_>,
        state: ConversationState,
        args: &str,
    ) -> Result<Outcome, TrackerError> {
        let amount = match parse_integer(args, "water amount") {
            Ok(amount) => amount,
            Err(_) => {
                return Ok(Outcome::new(state, vec![Reply::text(self.t(ctx, "water-usage"))]));
            }
        };

        let remaining = self
            .store
            .update(ctx.user_id, |profile| {
                profile.log_water(amount)?;
                Ok(profile.water_curr)
            })
            .await?;
        info!(user_id = %ctx.user_id, amount, remaining, "Water logged");

        Ok(Outcome::new(
            state,
            vec![
                Reply::text(self.t_args(ctx, "water-logged", &[("amount", &amount.to_string())])),
                Reply::text(self.t_args(
                    ctx,
                    "water-remaining",
                    &[("remaining", &remaining.to_string())],
                )),
            ],
        ))
    }

    async fn start_food_log(
        &self,
        ctx: &Ctx<'_>,
        state: ConversationState,
        args: &str,
    ) -> Result<Outcome, TrackerError> {
        let product = args.trim();
        if product.is_empty() {
            return Ok(Outcome::new(state, vec![Reply::text(self.t(ctx, "food-usage"))]));
        }

        match self.food.find_food(product).await {
            Ok(info) => {
                info!(
                    user_id = %ctx.user_id,
                    product = %product,
                    calories = info.calories_per_100g,
                    "Food found"
                );
                let name = info
                    .name
                    .clone()
                    .unwrap_or_else(|| self.t(ctx, "unknown-product"));
                let text = self.t_args(
                    ctx,
                    "food-found",
                    &[
                        ("name", &name),
                        ("calories", &info.calories_per_100g.to_string()),
                    ],
                );
                Ok(Outcome::new(
                    ConversationState::AwaitingGrams {
                        calories_per_100g: info.calories_per_100g,
                    },
                    vec![Reply::text(text)],
                ))
            }
            Err(e) => {
                warn!(user_id = %ctx.user_id, product = %product, error = %e, "Food lookup failed");
                Ok(Outcome::new(
                    ConversationState::Idle,
                    vec![Reply::text(self.t(ctx, "food-not-found"))],
                ))
            }
        }
    }

    async fn log_food(
        &self,
        ctx: &Ctx<'_>,
        calories_per_100g: f64,
        grams: i64,
    ) -> Result<Outcome, TrackerError> {
        let (consumed, remaining) = self
            .store
            .update(ctx.user_id, |profile| {
                let consumed = profile.log_food(calories_per_100g, grams)?;
                Ok((consumed, profile.calorie_curr))
            })
            .await?;
        info!(user_id = %ctx.user_id, grams, consumed, remaining, "Food logged");

        Ok(Outcome::new(
            ConversationState::Idle,
            vec![
                Reply::text(self.t_args(
                    ctx,
                    "food-logged",
                    &[("calories", &consumed.to_string())],
                )),
                Reply::text(self.t_args(
                    ctx,
                    "food-remaining",
                    &[("remaining", &remaining.to_string())],
                )),
            ],
        ))
    }

    fn choose_workout(&self, ctx: &Ctx<'_>, kind: WorkoutKind) -> Outcome {
        Outcome::new(
            ConversationState::AwaitingWorkoutMinutes { kind },
            vec![Reply::with_keyboard(self.t(ctx, "workout-ask-minutes"), Keyboard::Remove)],
        )
    }

    async fn log_workout(
        &self,
        ctx: &Ctx<'_>,
        kind: WorkoutKind,
        minutes: i64,
    ) -> Result<Outcome, TrackerError> {
        let effect = self
            .store
            .update(ctx.user_id, |profile| profile.log_workout(kind, minutes))
            .await?;
        info!(
            user_id = %ctx.user_id,
            kind = ?kind,
            minutes,
            burned = effect.burned_kcal,
            water_bonus = effect.water_bonus_ml,
            "Workout logged"
        );

        let key = match kind {
            WorkoutKind::Cardio => "workout-cardio-logged",
            WorkoutKind::Strength => "workout-strength-logged",
        };
        let mut replies = vec![Reply::text(self.t_args(
            ctx,
            key,
            &[
                ("minutes", &minutes.to_string()),
                ("calories", &effect.burned_kcal.to_string()),
            ],
        ))];
        if effect.water_bonus_ml != 0 {
            replies.push(Reply::text(self.t_args(
                ctx,
                "workout-water-bonus",
                &[("water", &effect.water_bonus_ml.to_string())],
            )));
        }

        Ok(Outcome::new(ConversationState::Idle, replies))
    }

    /// The question a state is waiting on, with its keyboard
    fn prompt_for(&self, ctx: &Ctx<'_>, state: &ConversationState) -> Option<Reply> {
        let reply = match state {
            ConversationState::Idle => return None,
            ConversationState::AwaitingWeight { .. } => {
                Reply::text(self.t(ctx, "setup-ask-weight"))
            }
            ConversationState::AwaitingHeight { .. } => {
                Reply::text(self.t(ctx, "setup-ask-height"))
            }
            ConversationState::AwaitingAge { .. } => Reply::text(self.t(ctx, "setup-ask-age")),
            ConversationState::AwaitingActivity { .. } => {
                Reply::text(self.t(ctx, "setup-ask-activity"))
            }
            ConversationState::AwaitingCity { .. } => Reply::text(self.t(ctx, "setup-ask-city")),
            ConversationState::AwaitingWaterGoal { .. } => {
                Reply::with_keyboard(self.t(ctx, "setup-ask-water-goal"), Keyboard::AutoWaterGoal)
            }
            ConversationState::AwaitingCalorieGoal { .. } => {
                Reply::with_keyboard(
                    self.t(ctx, "setup-ask-calorie-goal"),
                    Keyboard::AutoCalorieGoal,
                )
            }
            ConversationState::AwaitingConfirmation { .. } => {
                Reply::with_keyboard(self.t(ctx, "setup-confirm-prompt"), Keyboard::ConfirmProfile)
            }
            ConversationState::AwaitingGrams { .. } => Reply::text(self.t(ctx, "food-ask-grams")),
            ConversationState::ChoosingWorkout => {
                Reply::with_keyboard(self.t(ctx, "workout-choose"), Keyboard::WorkoutTypes)
            }
            ConversationState::AwaitingWorkoutMinutes { .. } => {
                Reply::text(self.t(ctx, "workout-ask-minutes"))
            }
        };
        Some(reply)
    }

    fn ask(&self, ctx: &Ctx<'_>, next: ConversationState, key: &str) -> Outcome {
        Outcome::new(next, vec![Reply::text(self.t(ctx, key))])
    }

    fn missing_profile_replies(&self, ctx: &Ctx<'_>) -> Vec<Reply> {
        vec![
            Reply::text(self.t(ctx, "profile-missing")),
            Reply::text(self.t(ctx, "profile-missing-hint")),
        ]
    }

    /// Match reply-keyboard workout labels in any supported language
    fn workout_kind_from_label(&self, text: &str) -> Option<WorkoutKind> {
        let text = text.trim().to_lowercase();
        let matches = |key: &str| {
            self.i18n
                .all_variants(key)
                .iter()
                .any(|label| label.to_lowercase() == text)
        };

        if matches("button-cardio") {
            Some(WorkoutKind::Cardio)
        } else if matches("button-strength") {
            Some(WorkoutKind::Strength)
        } else {
            None
        }
    }

    fn profile_summary(&self, ctx: &Ctx<'_>, profile: &Profile) -> String {
        self.t_args(
            ctx,
            "profile-summary",
            &[
                ("weight", &profile.weight.to_string()),
                ("height", &profile.height.to_string()),
                ("age", &profile.age.to_string()),
                ("activity", &profile.activity.to_string()),
                ("city", &profile.city),
                ("water_goal", &profile.water_goal.to_string()),
                ("calorie_goal", &profile.calorie_goal.to_string()),
            ],
        )
    }

    fn draft_summary(&self, ctx: &Ctx<'_>, draft: &SetupDraft) -> String {
        fn show<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        self.t_args(
            ctx,
            "profile-summary",
            &[
                ("weight", &show(&draft.weight)),
                ("height", &show(&draft.height)),
                ("age", &show(&draft.age)),
                ("activity", &show(&draft.activity)),
                ("city", &show(&draft.city)),
                ("water_goal", &show(&draft.water_goal)),
                ("calorie_goal", &show(&draft.calorie_goal)),
            ],
        )
    }

    fn progress_report(&self, ctx: &Ctx<'_>, profile: &Profile) -> String {
        self.t_args(
            ctx,
            "progress-report",
            &[
                ("water_consumed", &profile.water_consumed().to_string()),
                ("water_goal", &profile.water_goal.to_string()),
                ("water_remaining", &profile.water_curr.to_string()),
                ("calories_consumed", &profile.calories_consumed().to_string()),
                ("calorie_goal", &profile.calorie_goal.to_string()),
                ("calories_burned", &profile.calories_burned().to_string()),
                ("calories_remaining", &profile.calorie_curr.to_string()),
            ],
        )
    }

    fn t(&self, ctx: &Ctx<'_>, key: &str) -> String {
        self.i18n.t(key, ctx.lang)
    }

    fn t_args(&self, ctx: &Ctx<'_>, key: &str, args: &[(&str, &str)]) -> String {
        self.i18n.t_args(key, args, ctx.lang)
    }
}
