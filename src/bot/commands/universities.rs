use teloxide::prelude::*;

use crate::bot::AppContext;
use crate::services::universities::UniversityMatch;

pub async fn show_universities(
    bot: &Bot,
    chat_id: ChatId,
    tg_user_id: i64,
    ctx: &AppContext,
) -> ResponseResult<()> {
    let matches = match ctx.universities.recommend(tg_user_id).await {
        Ok(matches) => matches,
        Err(e) => {
            tracing::error!(
                "Failed to build university matches for user {}: {}",
                tg_user_id,
                e
            );
            bot.send_message(chat_id, "Could not load universities, please try again.")
                .await?;
            return Ok(());
        }
    };

    bot.send_message(chat_id, format_universities_text(&matches))
        .await?;
    Ok(())
}

fn format_universities_text(matches: &[UniversityMatch]) -> String {
    let mut lines = vec!["🎓 University benefits".to_string(), String::new()];

    let personalised = matches.iter().any(|m| !m.matched_olympiads.is_empty());
    if personalised {
        lines.push("Based on your favorite olympiads:".to_string());
    } else {
        lines.push(
            "Add olympiads to your favorites to get a personalised match. \
             Meanwhile, here is what these universities offer:"
                .to_string(),
        );
    }
    lines.push(String::new());

    for uni in matches {
        lines.push(format!("🏛 {}", uni.name));
        lines.push(uni.description.to_string());
        for benefit in uni.benefits {
            lines.push(format!("  ✔ {benefit}"));
        }
        if !uni.matched_olympiads.is_empty() {
            lines.push(format!(
                "  Matched by: {}",
                uni.matched_olympiads.join(", ")
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n").trim_end().to_string()
}
