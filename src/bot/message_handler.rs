//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use crate::commands::Command;
use crate::conversation::{Event, Tracker};
use crate::dialogue::TrackerDialogue;

use super::dialogue_manager::run_event;

fn language_code(msg: &Message) -> Option<&str> {
    msg.from
        .as_ref()
        .and_then(|user| user.language_code.as_deref())
}

/// Handle a recognised bot command
pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: TrackerDialogue,
    tracker: Arc<Tracker>,
) -> Result<()> {
    run_event(
        &bot,
        msg.chat.id,
        language_code(&msg),
        dialogue,
        &tracker,
        Event::Command(cmd),
    )
    .await
}

/// Handle any other message, interpreted by the current dialogue state
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: TrackerDialogue,
    tracker: Arc<Tracker>,
) -> Result<()> {
    match msg.text() {
        Some(text) => {
            run_event(
                &bot,
                msg.chat.id,
                language_code(&msg),
                dialogue,
                &tracker,
                Event::Text(text.to_string()),
            )
            .await
        }
        None => {
            debug!(user_id = %msg.chat.id, "Ignoring non-text message");
            Ok(())
        }
    }
}
