use teloxide::prelude::*;

use crate::bot::commands;
use crate::bot::{callback_is_open, AppContext};
use crate::utils::texts;

/// Routes callback queries by payload prefix:
/// `menu:*` main menu, `subj:<code>` subject listing, `olymp:<id>` add
/// favorite, `fav:rm:<id>` remove favorite, `mat:<id>` materials bundle,
/// `sub:*` subscription stub.
pub async fn callback_handler(bot: Bot, q: CallbackQuery, ctx: AppContext) -> ResponseResult<()> {
    let Some(data) = q.data.clone() else {
        bot.answer_callback_query(q.id.clone())
            .text("Invalid callback data")
            .await?;
        return Ok(());
    };

    let tg_user_id = q.from.id.0 as i64;
    let chat_id = q.message.as_ref().map(|m| m.chat.id);
    tracing::info!("Callback '{}' from user {}", data, tg_user_id);

    // Subscription gate mirrors the command handler: help and subscription
    // callbacks stay open, admins bypass, the rest needs a subscription.
    if !callback_is_open(&data) && !ctx.is_admin(tg_user_id) {
        let subscribed = match ctx.subscription.is_subscribed(tg_user_id).await {
            Ok(subscribed) => subscribed,
            Err(e) => {
                tracing::error!("Failed to check subscription for user {}: {}", tg_user_id, e);
                false
            }
        };
        if !subscribed {
            bot.answer_callback_query(q.id.clone())
                .text(texts::SUBSCRIPTION_REQUIRED)
                .show_alert(true)
                .await?;
            return Ok(());
        }
    }

    if let Some(menu_item) = data.strip_prefix("menu:") {
        bot.answer_callback_query(q.id.clone()).await?;
        let Some(chat_id) = chat_id else {
            return Ok(());
        };
        return match menu_item {
            "catalog" => commands::catalog::show_subjects(&bot, chat_id, &ctx).await,
            "favorites" => {
                commands::favorites::show_favorites(&bot, chat_id, tg_user_id, &ctx).await
            }
            "materials" => {
                commands::materials::show_materials_menu(&bot, chat_id, tg_user_id, &ctx).await
            }
            "universities" => {
                commands::universities::show_universities(&bot, chat_id, tg_user_id, &ctx).await
            }
            "subscription" => {
                commands::subscription::show_subscription(&bot, chat_id, tg_user_id, &ctx).await
            }
            "help" => commands::handle_help(&bot, chat_id).await,
            _ => Ok(()),
        };
    }

    if let Some(subject_code) = data.strip_prefix("subj:") {
        bot.answer_callback_query(q.id.clone()).await?;
        if let Some(chat_id) = chat_id {
            commands::catalog::show_olympiads(&bot, chat_id, &ctx, subject_code).await?;
        }
        return Ok(());
    }

    if let Some(raw_id) = data.strip_prefix("olymp:") {
        let Ok(olympiad_id) = raw_id.parse::<i64>() else {
            bot.answer_callback_query(q.id.clone())
                .text("Could not identify the olympiad")
                .show_alert(true)
                .await?;
            return Ok(());
        };
        return commands::catalog::add_favorite(&bot, &q, &ctx, olympiad_id).await;
    }

    if let Some(raw_id) = data.strip_prefix("fav:rm:") {
        let Ok(olympiad_id) = raw_id.parse::<i64>() else {
            bot.answer_callback_query(q.id.clone())
                .text("Could not identify the olympiad")
                .show_alert(true)
                .await?;
            return Ok(());
        };
        return commands::favorites::remove_favorite(&bot, &q, &ctx, olympiad_id).await;
    }

    if let Some(raw_id) = data.strip_prefix("mat:") {
        bot.answer_callback_query(q.id.clone()).await?;
        if let (Some(chat_id), Ok(olympiad_id)) = (chat_id, raw_id.parse::<i64>()) {
            commands::materials::show_bundle(&bot, chat_id, &ctx, olympiad_id).await?;
        }
        return Ok(());
    }

    match data.as_str() {
        "sub:pay" => commands::subscription::send_payment_link(&bot, &q, &ctx).await,
        "sub:activate" => commands::subscription::activate(&bot, &q, &ctx).await,
        _ => {
            bot.answer_callback_query(q.id.clone())
                .text("Unknown action")
                .await?;
            Ok(())
        }
    }
}
