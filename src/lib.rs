//! # Olympiad Bot
//!
//! A Telegram bot that helps students keep track of olympiad competitions.
//!
//! ## Features
//! - Browse an olympiad catalog by subject and bookmark favorites
//! - Automatic date reminders (week before registration closes, day before
//!   the round, day of the round) delivered by a background sweep
//! - Prep material bundles and university benefit matching
//! - Stub subscription/payment flow
//! - Persistent storage with SQLite

/// Bot command handlers and callback routing
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Business logic and background services
pub mod services;
/// Shared texts and validation helpers
pub mod utils;
