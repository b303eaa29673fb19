use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::bot::AppContext;
use crate::database::models::Olympiad;
use crate::utils::texts;

pub async fn show_subjects(bot: &Bot, chat_id: ChatId, ctx: &AppContext) -> ResponseResult<()> {
    let rows: Vec<Vec<InlineKeyboardButton>> = ctx
        .catalog
        .list_subjects()
        .iter()
        .map(|subject| {
            vec![InlineKeyboardButton::callback(
                subject.title,
                format!("subj:{}", subject.code),
            )]
        })
        .collect();

    bot.send_message(chat_id, texts::CATALOG_INTRO)
        .reply_markup(InlineKeyboardMarkup::new(rows))
        .await?;
    Ok(())
}

pub async fn show_olympiads(
    bot: &Bot,
    chat_id: ChatId,
    ctx: &AppContext,
    subject_code: &str,
) -> ResponseResult<()> {
    let Some(subject) = ctx.catalog.get_subject(subject_code) else {
        bot.send_message(chat_id, "That subject is not in the catalog.")
            .await?;
        return Ok(());
    };

    let olympiads = ctx.catalog.list_olympiads(subject_code);
    let text = format_olympiads_text(subject.title, olympiads);

    let mut rows: Vec<Vec<InlineKeyboardButton>> = olympiads
        .iter()
        .map(|olympiad| {
            vec![InlineKeyboardButton::callback(
                format!("❤ {}", olympiad.title),
                format!("olymp:{}", olympiad.id),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        "⬅ Back to subjects",
        "menu:catalog",
    )]);

    bot.send_message(chat_id, text)
        .reply_markup(InlineKeyboardMarkup::new(rows))
        .await?;
    Ok(())
}

fn format_olympiads_text(subject_title: &str, olympiads: &[Olympiad]) -> String {
    let mut lines = vec![format!("📚 {subject_title}"), String::new()];
    if olympiads.is_empty() {
        lines.push("Olympiads for this subject are coming soon.".to_string());
        return lines.join("\n");
    }

    lines.push("Available olympiads:".to_string());
    for olympiad in olympiads {
        let mut details = Vec::new();
        if let Some(deadline) = olympiad.reg_deadline {
            details.push(format!("register by {}", deadline.format("%d.%m.%Y")));
        }
        if let Some(round) = olympiad.round_date {
            details.push(format!("round on {}", round.format("%d.%m.%Y")));
        }
        let suffix = if details.is_empty() {
            String::new()
        } else {
            format!(" ({})", details.join(", "))
        };
        lines.push(format!("• {}{suffix}", olympiad.title));
        if let Some(description) = &olympiad.description {
            lines.push(format!("  {description}"));
        }
    }
    lines.push(String::new());
    lines.push("Tap a button below to add an olympiad to ❤ My olympiads.".to_string());
    lines.join("\n")
}

/// Handles the `olymp:<id>` favorite button.
pub async fn add_favorite(bot: &Bot, q: &CallbackQuery, ctx: &AppContext, olympiad_id: i64) -> ResponseResult<()> {
    let username = q.from.username.as_deref();
    match ctx
        .catalog
        .add_to_favorites(q.from.id.0 as i64, olympiad_id, username)
        .await
    {
        Ok(true) => {
            if let Some(message) = &q.message {
                bot.send_message(message.chat.id, texts::FAVORITE_ADDED).await?;
            }
            bot.answer_callback_query(q.id.clone())
                .text("Added to favorites ✨")
                .await?;
        }
        Ok(false) => {
            bot.answer_callback_query(q.id.clone())
                .text(texts::FAVORITE_ALREADY_PRESENT)
                .show_alert(true)
                .await?;
        }
        Err(e) => {
            tracing::error!("Failed to add favorite for user {}: {}", q.from.id, e);
            bot.answer_callback_query(q.id.clone())
                .text("Could not add the olympiad, please try again")
                .show_alert(true)
                .await?;
        }
    }
    Ok(())
}
