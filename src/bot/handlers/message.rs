use teloxide::prelude::*;

use crate::bot::commands::{self, Command};
use crate::bot::{command_is_open, AppContext};
use crate::utils::texts;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: AppContext,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let tg_user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or(0);
    tracing::info!("Command from user {} in chat {}", tg_user_id, chat_id);

    // Subscription gate: /start, /help and /subscription are always open,
    // admins bypass, everyone else needs an active subscription.
    if !command_is_open(&cmd) && !ctx.is_admin(tg_user_id) {
        let subscribed = match ctx.subscription.is_subscribed(tg_user_id).await {
            Ok(subscribed) => subscribed,
            Err(e) => {
                tracing::error!("Failed to check subscription for user {}: {}", tg_user_id, e);
                false
            }
        };
        if !subscribed {
            bot.send_message(chat_id, texts::SUBSCRIPTION_REQUIRED).await?;
            return Ok(());
        }
    }

    match cmd {
        Command::Help => commands::handle_help(&bot, chat_id).await,
        Command::Start => commands::handle_start(&bot, chat_id).await,
        Command::Catalog => commands::catalog::show_subjects(&bot, chat_id, &ctx).await,
        Command::Favorites => {
            commands::favorites::show_favorites(&bot, chat_id, tg_user_id, &ctx).await
        }
        Command::Materials => {
            commands::materials::show_materials_menu(&bot, chat_id, tg_user_id, &ctx).await
        }
        Command::Universities => {
            commands::universities::show_universities(&bot, chat_id, tg_user_id, &ctx).await
        }
        Command::Subscription => {
            commands::subscription::show_subscription(&bot, chat_id, tg_user_id, &ctx).await
        }
        Command::AddMaterial {
            olympiad_id,
            url,
            title,
        } => {
            commands::admin::handle_add_material(&bot, &msg, &ctx, olympiad_id, &url, &title).await
        }
        Command::ListMaterials => commands::admin::handle_list_materials(&bot, &msg, &ctx).await,
        Command::DelMaterial { material_id } => {
            commands::admin::handle_delete_material(&bot, &msg, &ctx, material_id).await
        }
    }
}
