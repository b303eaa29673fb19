//! # Olympiad Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database, starts
//! the reminder dispatcher, and runs the Telegram bot alongside the health
//! check server.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bot;
mod config;
mod database;
mod services;
mod utils;

use crate::bot::handlers::BotHandler;
use crate::bot::AppContext;
use crate::config::Config;
use crate::database::connection::DatabaseManager;
use crate::services::catalog::CatalogService;
use crate::services::dispatcher::{ReminderDispatcher, TelegramNotifier};
use crate::services::favorites::FavoritesService;
use crate::services::health::HealthService;
use crate::services::materials::MaterialsService;
use crate::services::reminder::ReminderService;
use crate::services::subscription::SubscriptionService;
use crate::services::universities::UniversitiesService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "olympiad_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Olympiad Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}",
        config.database_url, config.http_port
    );

    // Initialize database
    info!("Initializing database connection...");
    let db = Arc::new(DatabaseManager::new(&config.database_url).await?);
    db.run_migrations().await?;
    info!("Database initialized successfully");

    // Initialize bot
    let bot = Bot::new(&config.telegram_bot_token);

    // Services are constructed once here and handed to whoever needs them.
    let reminders = Arc::new(ReminderService::new(db.clone(), config.reminder_time_utc));
    let ctx = AppContext {
        catalog: Arc::new(CatalogService::new(db.clone(), reminders.clone())),
        favorites: Arc::new(FavoritesService::new(db.clone())),
        materials: Arc::new(MaterialsService::new(db.clone())),
        universities: Arc::new(UniversitiesService::new(db.clone())),
        subscription: Arc::new(SubscriptionService::new(
            db.clone(),
            config.pay_provider.clone(),
            config.pay_return_url.clone(),
        )),
        admin_ids: Arc::new(config.admin_ids.clone()),
    };
    let handler = BotHandler::new(ctx);

    // Start the background reminder dispatcher
    let notifier = Arc::new(TelegramNotifier::new(bot.clone(), db.clone()));
    let dispatcher = Arc::new(ReminderDispatcher::new(
        db.clone(),
        notifier,
        config.sweep_interval,
    ));
    let dispatcher_handle = dispatcher.start();

    // Health check server
    let health_service = HealthService::new(db.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;
    info!("Health check server starting on port {}", config.http_port);

    // Run both the bot and health server concurrently
    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    dispatcher_handle.stop().await;
    info!("Application stopped");
    Ok(())
}
