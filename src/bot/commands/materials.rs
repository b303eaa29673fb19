use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::bot::AppContext;
use crate::services::materials::{MaterialLink, MaterialsBundle};
use crate::utils::texts;

/// Lists the user's favorites as buttons; picking one shows its bundle.
pub async fn show_materials_menu(
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

    if favorites.is_empty() {
        bot.send_message(chat_id, texts::MATERIALS_NO_FAVORITES).await?;
        return Ok(());
    }

    let rows: Vec<Vec<InlineKeyboardButton>> = favorites
        .iter()
        .map(|fav| {
            vec![InlineKeyboardButton::callback(
                fav.title.clone(),
                format!("mat:{}", fav.olympiad_id),
            )]
        })
        .collect();

    bot.send_message(chat_id, "📚 Pick an olympiad to get prep materials:")
        .reply_markup(InlineKeyboardMarkup::new(rows))
        .await?;
    Ok(())
}

pub async fn show_bundle(
    bot: &Bot,
    chat_id: ChatId,
    ctx: &AppContext,
    olympiad_id: i64,
) -> ResponseResult<()> {
    let bundle = match ctx.materials.get_materials(olympiad_id).await {
        Ok(bundle) => bundle,
        Err(e) => {
            tracing::error!("Failed to load materials for olympiad {}: {}", olympiad_id, e);
            bot.send_message(chat_id, "Could not load materials, please try again.")
                .await?;
            return Ok(());
        }
    };

    let title = ctx
        .catalog
        .get_olympiad(olympiad_id)
        .map(|o| o.title.clone())
        .unwrap_or_else(|| format!("Olympiad #{olympiad_id}"));

    bot.send_message(chat_id, format_bundle_text(&title, &bundle))
        .await?;
    Ok(())
}

fn format_bundle_text(olympiad_title: &str, bundle: &MaterialsBundle) -> String {
    let mut lines = vec![format!("📚 Prep materials — {olympiad_title}"), String::new()];

    let mut section = |heading: &str, links: &[MaterialLink]| {
        if links.is_empty() {
            return;
        }
        lines.push(heading.to_string());
        for item in links {
            lines.push(format!("• {} — {}", item.title, item.url));
        }
        lines.push(String::new());
    };

    section("📝 Past problems:", &bundle.past_problems);
    section("📖 Theory:", &bundle.theory);
    section("📰 Articles:", &bundle.articles);
    section("➕ Extra links:", &bundle.additional);

    lines.join("\n").trim_end().to_string()
}
