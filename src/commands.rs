//! Bot commands understood by the tracker

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "snake_case", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "начать работу")]
    Start,
    #[command(description = "показать список команд")]
    Help,
    #[command(description = "заполнить профиль")]
    SetProfile,
    #[command(description = "показать профиль")]
    ShowProfile,
    #[command(description = "сбросить текущие данные")]
    Reset,
    #[command(description = "записать выпитую воду в мл")]
    LogWater(String),
    #[command(description = "записать съеденный продукт")]
    LogFood(String),
    #[command(description = "записать тренировку")]
    LogWorkout,
    #[command(description = "показать прогресс за день")]
    CheckProgress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse("/set_profile", "tracker_bot").unwrap(), Command::SetProfile);
        assert_eq!(
            Command::parse("/log_water 250", "tracker_bot").unwrap(),
            Command::LogWater("250".to_string())
        );
        assert_eq!(
            Command::parse("/log_food greek yogurt", "tracker_bot").unwrap(),
            Command::LogFood("greek yogurt".to_string())
        );
        assert_eq!(
            Command::parse("/log_food", "tracker_bot").unwrap(),
            Command::LogFood(String::new())
        );
        assert!(Command::parse("/unknown", "tracker_bot").is_err());
    }
}
