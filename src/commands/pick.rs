use indoc::formatdoc;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::{
    commands::{internal_err, unauthorized, CommandResult, Context},
    lookup::redirect_url,
    utils::formatting::format_month_day,
};

const PLAY_WINDOW_DAYS: i64 = 7;

/// Picks the next game round-robin, announces it, and updates the site.
#[poise::command(slash_command, rename = "pick_next")]
pub async fn pick_next(ctx: Context<'_>) -> CommandResult {
    let state = ctx.data();

    if !state.authorizer.is_owner(ctx.author().id) {
        return Err(unauthorized(
            "Sorry, only the club owner can pick the next game.",
        ));
    }

    info!("{} triggered pick_next", ctx.author().name);
    ctx.defer().await?;

    let Some(pick) = state
        .pick_repository
        .pick_next()
        .await
        .map_err(|err| internal_err(format!("Could not pick the next game: {err}")))?
    else {
        ctx.say("No games left to pick from.").await?;
        return Ok(());
    };

    // Best-effort enrichment; lookup failures degrade to placeholders.
    let estimated_time = match state.igdb.time_to_beat_hours(&pick.game_name).await {
        Ok(Some(hours)) => format!("~{hours} hours"),
        Ok(None) => "Unknown".to_string(),
        Err(err) => {
            warn!("Time-to-beat lookup failed for {}: {err}", pick.game_name);
            "Unknown".to_string()
        }
    };

    let price = match state.cheapshark.find_cheapest(&pick.game_name).await {
        Ok(Some(game_match)) => match (game_match.cheapest, game_match.cheapest_deal_id) {
            (Some(price), Some(deal_id)) => {
                format!("[${price} here]({url})", url = redirect_url(&deal_id))
            }
            _ => "Unknown — Check link".to_string(),
        },
        Ok(None) => "Unknown — Check link".to_string(),
        Err(err) => {
            warn!("Price lookup failed for {}: {err}", pick.game_name);
            "Unknown — Check link".to_string()
        }
    };

    let today = OffsetDateTime::now_utc().date();
    let discussion_date = today + Duration::days(PLAY_WINDOW_DAYS);

    let message = formatdoc! {
        r#"
            🎮 **Game Pick:**
            **Selected By:** {submitter}
            **Game:** [{name}]({url})
            **Price:** {price}
            **Estimated Time to Finish:** {estimated_time}

            **Play Period:** {start} → {end}
            We'll meet for discussion on **{end}** — time TBA.
        "#,
        submitter = pick.submitter_name,
        name = pick.game_name,
        url = pick.url,
        price = price,
        estimated_time = estimated_time,
        start = format_month_day(today),
        end = format_month_day(discussion_date),
    };

    match state
        .announcement_channel
        .say(ctx.serenity_context(), &message)
        .await
    {
        Ok(_) => {
            ctx.say(format!("🎮 **{}** picked and announced.", pick.game_name))
                .await?;
        }
        Err(err) => {
            warn!("Could not post to the announcement channel: {err}");
            ctx.say(message).await?;
        }
    }

    Ok(())
}
