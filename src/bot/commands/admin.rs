use teloxide::prelude::*;

use crate::bot::AppContext;
use crate::utils::texts;
use crate::utils::validation::{validate_material_title, validate_material_url};

/// `/addmaterial <olympiad_id> <url> <title>` — admin-only.
pub async fn handle_add_material(
    bot: &Bot,
    msg: &Message,
    ctx: &AppContext,
    olympiad_id: i64,
    url: &str,
    title: &str,
) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let tg_id = user.id.0 as i64;

    if !ctx.is_admin(tg_id) {
        bot.send_message(msg.chat.id, texts::NOT_AN_ADMIN).await?;
        return Ok(());
    }

    // Materials reference the olympiad row by foreign key.
    if let Err(e) = ctx.catalog.ensure_stored(olympiad_id).await {
        tracing::warn!("Rejected /addmaterial for olympiad {}: {}", olympiad_id, e);
        bot.send_message(msg.chat.id, format!("Unknown olympiad id: {olympiad_id}"))
            .await?;
        return Ok(());
    }

    if let Err(e) = validate_material_title(title).and_then(|_| validate_material_url(url)) {
        bot.send_message(msg.chat.id, format!("❌ {e}")).await?;
        return Ok(());
    }

    match ctx
        .materials
        .create_material(olympiad_id, title, url, tg_id)
        .await
    {
        Ok(material) => {
            bot.send_message(
                msg.chat.id,
                format!(
                    "✅ Material #{} added to olympiad {}.",
                    material.id, olympiad_id
                ),
            )
            .await?;
        }
        Err(e) => {
            tracing::error!("Failed to create material: {}", e);
            bot.send_message(msg.chat.id, "Could not save the material, please try again.")
                .await?;
        }
    }
    Ok(())
}

/// `/listmaterials` — admin-only overview of stored material links.
pub async fn handle_list_materials(bot: &Bot, msg: &Message, ctx: &AppContext) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    if !ctx.is_admin(user.id.0 as i64) {
        bot.send_message(msg.chat.id, texts::NOT_AN_ADMIN).await?;
        return Ok(());
    }

    match ctx.materials.list_materials().await {
        Ok(materials) if materials.is_empty() => {
            bot.send_message(msg.chat.id, "No materials stored yet.").await?;
        }
        Ok(materials) => {
            let mut lines = vec!["📚 Stored materials:".to_string()];
            for material in &materials {
                lines.push(format!(
                    "#{} [olympiad {}] {} — {}",
                    material.id, material.olympiad_id, material.title, material.url
                ));
            }
            lines.push(String::new());
            lines.push("Remove one with /delmaterial <id>.".to_string());
            bot.send_message(msg.chat.id, lines.join("\n")).await?;
        }
        Err(e) => {
            tracing::error!("Failed to list materials: {}", e);
            bot.send_message(msg.chat.id, "Could not load materials, please try again.")
                .await?;
        }
    }
    Ok(())
}

/// `/delmaterial <id>` — admin-only.
pub async fn handle_delete_material(
    bot: &Bot,
    msg: &Message,
    ctx: &AppContext,
    material_id: i64,
) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    if !ctx.is_admin(user.id.0 as i64) {
        bot.send_message(msg.chat.id, texts::NOT_AN_ADMIN).await?;
        return Ok(());
    }

    match ctx.materials.delete_material(material_id).await {
        Ok(true) => {
            bot.send_message(msg.chat.id, format!("🗑 Material #{material_id} deleted."))
                .await?;
        }
        Ok(false) => {
            bot.send_message(msg.chat.id, format!("Material #{material_id} was not found."))
                .await?;
        }
        Err(e) => {
            tracing::error!("Failed to delete material {}: {}", material_id, e);
            bot.send_message(msg.chat.id, "Could not delete the material, please try again.")
                .await?;
        }
    }
    Ok(())
}
