use anyhow::{anyhow, Result};
use chrono::NaiveTime;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    pub admin_ids: Vec<i64>,
    /// UTC time of day at which date-based reminders fire.
    pub reminder_time_utc: NaiveTime,
    /// How often the dispatcher checks for due reminders.
    pub sweep_interval: Duration,
    pub pay_provider: String,
    pub pay_return_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/olympiad.db".to_string());
        let database_url = if database_url.trim().is_empty() {
            "sqlite:./data/olympiad.db".to_string()
        } else {
            database_url
        };

        let port_str = env::var("HTTP_PORT")
            .unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str.trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let admin_ids = parse_admin_ids(&env::var("ADMIN_IDS").unwrap_or_default())?;

        let time_str = env::var("REMINDER_TIME_UTC")
            .unwrap_or_else(|_| "09:00".to_string());
        let reminder_time_utc = NaiveTime::parse_from_str(time_str.trim(), "%H:%M")
            .map_err(|_| anyhow!("Invalid REMINDER_TIME_UTC, expected HH:MM"))?;

        let interval_str = env::var("SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string());
        let interval_secs: u64 = interval_str.trim()
            .parse()
            .map_err(|_| anyhow!("Invalid SWEEP_INTERVAL_SECS"))?;
        if interval_secs == 0 {
            return Err(anyhow!("SWEEP_INTERVAL_SECS must be positive"));
        }

        let pay_provider = env::var("PAY_PROVIDER")
            .unwrap_or_else(|_| "example-pay".to_string());
        let pay_return_url = env::var("PAY_RETURN_URL")
            .unwrap_or_else(|_| "https://t.me".to_string());

        Ok(Config {
            telegram_bot_token: token,
            database_url,
            http_port,
            admin_ids,
            reminder_time_utc,
            sweep_interval: Duration::from_secs(interval_secs),
            pay_provider,
            pay_return_url,
        })
    }

    pub fn is_admin(&self, tg_id: i64) -> bool {
        self.admin_ids.contains(&tg_id)
    }
}

fn parse_admin_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse()
                .map_err(|_| anyhow!("Invalid admin id in ADMIN_IDS: {item}"))
        })
        .collect()
}
