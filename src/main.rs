use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fitness_tracker::bot;
use fitness_tracker::commands::Command;
use fitness_tracker::config::Config;
use fitness_tracker::conversation::Tracker;
use fitness_tracker::dialogue::ConversationState;
use fitness_tracker::localization::LocalizationManager;
use fitness_tracker::lookup::{OpenFoodFactsClient, OpenWeatherClient};
use fitness_tracker::store::ProfileStore;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting Fitness Tracker Telegram Bot");

    let config = Config::from_env().context("Invalid configuration")?;

    info!(path = %config.store_path.display(), "Using profile store");

    let http = reqwest::Client::new();
    let food = Arc::new(OpenFoodFactsClient::new(http.clone(), &config.food_api_url));
    let weather = Arc::new(OpenWeatherClient::new(
        http,
        &config.weather_api_url,
        &config.weather_api_key,
    ));
    let localization = Arc::new(LocalizationManager::new()?);
    let store = ProfileStore::new(&config.store_path);

    let tracker = Arc::new(Tracker::new(store, food, weather, localization));

    let bot = Bot::new(&config.bot_token);

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    info!("Bot initialized, starting dispatcher");

    Dispatcher::builder(bot, bot::schema())
        .dependencies(dptree::deps![
            InMemStorage::<ConversationState>::new(),
            tracker
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
