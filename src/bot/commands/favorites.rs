use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::bot::AppContext;
use crate::database::models::FavoriteOlympiad;
use crate::utils::texts;

pub async fn show_favorites(
    bot: &Bot,
    chat_id: ChatId,
    tg_user_id: i64,
    ctx: &AppContext,
) -> ResponseResult<()> {
    let favorites = match ctx.favorites.list_favorites(tg_user_id).await {
        Ok(favorites) => favorites,
        Err(e) => {
            tracing::error!("Failed to load favorites for user {}: {}", tg_user_id, e);
            bot.send_message(chat_id, "Could not load your favorites, please try again.")
                .await?;
            return Ok(());
        }
    };

    let text = format_favorites_text(&favorites);
    let rows: Vec<Vec<InlineKeyboardButton>> = favorites
        .iter()
        .map(|fav| {
            vec![InlineKeyboardButton::callback(
                format!("🗑 Remove: {}", fav.title),
                format!("fav:rm:{}", fav.olympiad_id),
            )]
        })
        .collect();

    let mut request = bot.send_message(chat_id, text);
    if !rows.is_empty() {
        request = request.reply_markup(InlineKeyboardMarkup::new(rows));
    }
    request.await?;
    Ok(())
}

fn format_favorites_text(favorites: &[FavoriteOlympiad]) -> String {
    if favorites.is_empty() {
        return format!("❤ My olympiads\n\n{}", texts::FAVORITES_EMPTY);
    }

    let mut lines = vec!["❤ My olympiads".to_string(), String::new()];
    lines.push("Your saved olympiads:".to_string());
    for fav in favorites {
        let mut meta = Vec::new();
        if let Some(deadline) = fav.reg_deadline {
            meta.push(format!("register by {}", deadline.format("%d.%m.%Y")));
        }
        if let Some(round) = fav.round_date {
            meta.push(format!("round on {}", round.format("%d.%m.%Y")));
        }
        let suffix = if meta.is_empty() {
            String::new()
        } else {
            format!(" ({})", meta.join(", "))
        };
        lines.push(format!("• {}{suffix}", fav.title));
    }
    lines.push(String::new());
    lines.push("Use /materials for prep links; the buttons below remove an olympiad.".to_string());
    lines.join("\n")
}

/// Handles the `fav:rm:<id>` button.
pub async fn remove_favorite(
    bot: &Bot,
    q: &CallbackQuery,
    ctx: &AppContext,
    olympiad_id: i64,
) -> ResponseResult<()> {
    match ctx
        .favorites
        .remove_favorite(q.from.id.0 as i64, olympiad_id)
        .await
    {
        Ok(true) => {
            bot.answer_callback_query(q.id.clone())
                .text("Olympiad removed")
                .await?;
            if let Some(message) = &q.message {
                show_favorites(bot, message.chat.id, q.from.id.0 as i64, ctx).await?;
            }
        }
        Ok(false) => {
            bot.answer_callback_query(q.id.clone())
                .text("That olympiad is not in your list")
                .await?;
        }
        Err(e) => {
            tracing::error!("Failed to remove favorite for user {}: {}", q.from.id, e);
            bot.answer_callback_query(q.id.clone())
                .text("Could not remove the olympiad, please try again")
                .show_alert(true)
                .await?;
        }
    }
    Ok(())
}
