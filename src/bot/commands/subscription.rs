use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::bot::AppContext;
use crate::utils::texts;

pub async fn show_subscription(
    bot: &Bot,
    chat_id: ChatId,
    tg_user_id: i64,
    ctx: &AppContext,
) -> ResponseResult<()> {
    let subscribed = match ctx.subscription.is_subscribed(tg_user_id).await {
        Ok(subscribed) => subscribed,
        Err(e) => {
            tracing::error!("Failed to check subscription for user {}: {}", tg_user_id, e);
            bot.send_message(chat_id, "Could not check your subscription, please try again.")
                .await?;
            return Ok(());
        }
    };

    if subscribed {
        bot.send_message(chat_id, texts::SUBSCRIPTION_ACTIVE).await?;
        return Ok(());
    }

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("💳 Get payment link", "sub:pay")],
        vec![InlineKeyboardButton::callback("✅ I have paid", "sub:activate")],
    ]);
    bot.send_message(chat_id, texts::SUBSCRIPTION_INTRO)
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

/// Handles the `sub:pay` button: sends a stub invoice link.
pub async fn send_payment_link(bot: &Bot, q: &CallbackQuery, ctx: &AppContext) -> ResponseResult<()> {
    let username = q.from.username.as_deref();
    match ctx
        .subscription
        .create_payment_link(q.from.id.0 as i64, username)
        .await
    {
        Ok(link) => {
            if let Some(message) = &q.message {
                bot.send_message(
                    message.chat.id,
                    format!("💳 Your payment link (demo, no real charge):\n{link}"),
                )
                .await?;
            }
            bot.answer_callback_query(q.id.clone()).await?;
        }
        Err(e) => {
            tracing::error!("Failed to create payment link for user {}: {}", q.from.id, e);
            bot.answer_callback_query(q.id.clone())
                .text("Could not create a payment link, please try again")
                .show_alert(true)
                .await?;
        }
    }
    Ok(())
}

/// Handles the `sub:activate` button: stub activation, no provider callback.
pub async fn activate(bot: &Bot, q: &CallbackQuery, ctx: &AppContext) -> ResponseResult<()> {
    let username = q.from.username.as_deref();
    match ctx
        .subscription
        .activate(q.from.id.0 as i64, username)
        .await
    {
        Ok(()) => {
            if let Some(message) = &q.message {
                bot.send_message(message.chat.id, texts::SUBSCRIPTION_ACTIVATED)
                    .await?;
            }
            bot.answer_callback_query(q.id.clone()).await?;
        }
        Err(e) => {
            tracing::error!("Failed to activate subscription for user {}: {}", q.from.id, e);
            bot.answer_callback_query(q.id.clone())
                .text("Could not activate the subscription, please try again")
                .show_alert(true)
                .await?;
        }
    }
    Ok(())
}
