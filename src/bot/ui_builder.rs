//! UI Builder module for creating keyboards

use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, KeyboardRemove,
    ReplyMarkup,
};

use crate::conversation::{ButtonAction, Keyboard};
use crate::localization::LocalizationManager;

/// Render a conversation keyboard as Telegram reply markup
pub fn build_keyboard(
    keyboard: Keyboard,
    i18n: &LocalizationManager,
    language_code: Option<&str>,
) -> ReplyMarkup {
    match keyboard {
        Keyboard::AutoWaterGoal => {
            inline_button(i18n.t("button-auto", language_code), ButtonAction::AutoWaterGoal)
        }
        Keyboard::AutoCalorieGoal => {
            inline_button(i18n.t("button-auto", language_code), ButtonAction::AutoCalorieGoal)
        }
        Keyboard::ConfirmProfile => {
            inline_button(i18n.t("button-yes", language_code), ButtonAction::ConfirmProfile)
        }
        Keyboard::WorkoutTypes => create_workout_keyboard(i18n, language_code),
        Keyboard::Remove => ReplyMarkup::KeyboardRemove(KeyboardRemove::new()),
    }
}

fn inline_button(label: String, action: ButtonAction) -> ReplyMarkup {
    ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(label, action.callback_data()),
    ]]))
}

/// Create the reply keyboard offering the workout types
pub fn create_workout_keyboard(
    i18n: &LocalizationManager,
    language_code: Option<&str>,
) -> ReplyMarkup {
    let buttons = vec![vec![
        KeyboardButton::new(i18n.t("button-cardio", language_code)),
        KeyboardButton::new(i18n.t("button-strength", language_code)),
    ]];

    ReplyMarkup::Keyboard(
        KeyboardMarkup::new(buttons)
            .resize_keyboard()
            .input_field_placeholder(i18n.t("workout-choose", language_code)),
    )
}
