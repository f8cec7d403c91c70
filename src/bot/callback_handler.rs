//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{debug, warn};

use crate::conversation::{ButtonAction, Event, Tracker};
use crate::dialogue::TrackerDialogue;

use super::dialogue_manager::run_event;

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: TrackerDialogue,
    tracker: Arc<Tracker>,
) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query from user");

    // Answer first so the button stops spinning even if handling fails
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(action) = q.data.as_deref().and_then(ButtonAction::from_callback_data) else {
        warn!(user_id = %q.from.id, data = ?q.data, "Unknown callback data");
        return Ok(());
    };

    let chat_id = q
        .message
        .as_ref()
        .map(|msg| msg.chat().id)
        .unwrap_or_else(|| ChatId::from(q.from.id));

    run_event(
        &bot,
        chat_id,
        q.from.language_code.as_deref(),
        dialogue,
        &tracker,
        Event::Button(action),
    )
    .await
}
