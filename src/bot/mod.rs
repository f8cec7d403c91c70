//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Handles commands and free-text messages
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Renders conversation keyboards as Telegram markup
//! - `dialogue_manager`: Runs events through the tracker and stores the next state

pub mod callback_handler;
pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

use teloxide::dispatching::dialogue::{self, InMemStorage};
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use tracing::info;

use crate::commands::Command;
use crate::dialogue::ConversationState;

pub use callback_handler::callback_handler;
pub use message_handler::{command_handler, message_handler};

/// Build the dispatcher handler tree
///
/// Commands are matched before state-specific text, so a command always wins
/// over whatever flow the user is in.
pub fn schema() -> UpdateHandler<anyhow::Error> {
    let messages = Update::filter_message()
        .inspect(|msg: Message| {
            info!(
                user_id = %msg.chat.id,
                text_length = msg.text().map(str::len).unwrap_or(0),
                "Received message"
            );
        })
        .branch(dptree::entry().filter_command::<Command>().endpoint(command_handler))
        .branch(dptree::endpoint(message_handler));

    dialogue::enter::<Update, InMemStorage<ConversationState>, ConversationState, _>()
        .branch(messages)
        .branch(Update::filter_callback_query().endpoint(callback_handler))
}
