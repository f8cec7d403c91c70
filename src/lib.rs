//! # Fitness Tracker Telegram Bot
//!
//! A Telegram bot that collects a user profile, derives daily water and
//! calorie goals, and tracks water, food and workouts against them. Profiles
//! live in a single shared JSON file.

pub mod bot;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod dialogue;
pub mod errors;
pub mod goals;
pub mod localization;
pub mod lookup;
pub mod profile;
pub mod store;
