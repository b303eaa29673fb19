pub mod admin;
pub mod catalog;
pub mod favorites;
pub mod materials;
pub mod subscription;
pub mod universities;

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::command::{BotCommands, ParseError};

use crate::utils::texts;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Olympiad bot commands:")]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Start the bot and show the main menu")]
    Start,
    #[command(description = "Browse the olympiad catalog")]
    Catalog,
    #[command(description = "Show your favorite olympiads")]
    Favorites,
    #[command(description = "Prep materials for your favorites")]
    Materials,
    #[command(description = "University benefits for your favorites")]
    Universities,
    #[command(description = "Manage your subscription")]
    Subscription,
    #[command(
        description = "Admin: add a material link (<olympiad_id> <url> <title>)",
        parse_with = parse_material_args
    )]
    AddMaterial {
        olympiad_id: i64,
        url: String,
        title: String,
    },
    #[command(description = "Admin: list stored materials")]
    ListMaterials,
    #[command(description = "Admin: delete a material by id")]
    DelMaterial { material_id: i64 },
}

/// Parses `/addmaterial <olympiad_id> <url> <title>`. The title is the whole
/// tail of the message, so it may contain spaces.
fn parse_material_args(input: String) -> Result<(i64, String, String), ParseError> {
    const USAGE: &str = "expected: <olympiad_id> <url> <title>";

    let input = input.trim();
    let (raw_id, rest) = input
        .split_once(char::is_whitespace)
        .ok_or_else(|| ParseError::Custom(USAGE.into()))?;
    let (url, title) = rest
        .trim_start()
        .split_once(char::is_whitespace)
        .ok_or_else(|| ParseError::Custom(USAGE.into()))?;
    let title = title.trim_start();
    if title.is_empty() {
        return Err(ParseError::Custom(USAGE.into()));
    }
    let olympiad_id = raw_id
        .parse()
        .map_err(|_| ParseError::Custom("olympiad id must be a number".into()))?;

    Ok((olympiad_id, url.to_string(), title.to_string()))
}

fn main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("🗂 Catalog", "menu:catalog")],
        vec![InlineKeyboardButton::callback("❤ My olympiads", "menu:favorites")],
        vec![InlineKeyboardButton::callback("📚 Prep materials", "menu:materials")],
        vec![InlineKeyboardButton::callback("🎓 Universities", "menu:universities")],
        vec![InlineKeyboardButton::callback("⭐ Subscription", "menu:subscription")],
        vec![InlineKeyboardButton::callback("ℹ️ Help", "menu:help")],
    ])
}

pub async fn handle_start(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    bot.send_message(chat_id, texts::START_GREETING)
        .reply_markup(main_menu_keyboard())
        .await?;
    Ok(())
}

pub async fn handle_help(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    bot.send_message(chat_id, texts::HELP_TEXT).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn add_material_title_may_contain_spaces() {
        let cmd = Command::parse(
            "/addmaterial 3 https://example.org/archive Collected past problems",
            "testbot",
        )
        .unwrap();

        let Command::AddMaterial { olympiad_id, url, title } = cmd else {
            unreachable!("parsed into the wrong command");
        };
        assert_eq!(olympiad_id, 3);
        assert_eq!(url, "https://example.org/archive");
        assert_eq!(title, "Collected past problems");
    }

    #[test]
    fn add_material_rejects_missing_arguments() {
        assert!(Command::parse("/addmaterial 3 https://example.org/archive", "testbot").is_err());
        assert!(Command::parse("/addmaterial 3", "testbot").is_err());
        assert!(Command::parse("/addmaterial not-a-number u t", "testbot").is_err());
    }

    #[test]
    fn del_material_takes_a_numeric_id() {
        let cmd = Command::parse("/delmaterial 12", "testbot").unwrap();
        let Command::DelMaterial { material_id } = cmd else {
            unreachable!("parsed into the wrong command");
        };
        assert_eq!(material_id, 12);
    }
}
