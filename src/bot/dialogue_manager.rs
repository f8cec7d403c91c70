//! Dialogue Manager module for applying conversation outcomes

use anyhow::Result;
use teloxide::prelude::*;
use tracing::debug;

use crate::conversation::{Event, Outcome, Tracker};
use crate::dialogue::TrackerDialogue;

use super::ui_builder::build_keyboard;

/// Run one event through the tracker and apply the outcome to Telegram
pub async fn run_event(
    bot: &Bot,
    chat_id: ChatId,
    language_code: Option<&str>,
    dialogue: TrackerDialogue,
    tracker: &Tracker,
    event: Event,
) -> Result<()> {
    let state = dialogue.get_or_default().await?;
    let outcome = tracker
        .handle(&chat_id.to_string(), language_code, state, event)
        .await;

    apply_outcome(bot, chat_id, language_code, dialogue, tracker, outcome).await
}

/// Store the next state, then send the replies in order
pub async fn apply_outcome(
    bot: &Bot,
    chat_id: ChatId,
    language_code: Option<&str>,
    dialogue: TrackerDialogue,
    tracker: &Tracker,
    outcome: Outcome,
) -> Result<()> {
    dialogue.update(outcome.state).await?;

    for reply in outcome.replies {
        debug!(user_id = %chat_id, keyboard = ?reply.keyboard, "Sending reply");
        let mut request = bot.send_message(chat_id, reply.text);
        if let Some(keyboard) = reply.keyboard {
            request = request.reply_markup(build_keyboard(
                keyboard,
                tracker.localization(),
                language_code,
            ));
        }
        request.await?;
    }

    Ok(())
}
