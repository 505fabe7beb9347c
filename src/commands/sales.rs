use tracing::{info, warn};

use crate::{
    commands::{internal_err, CommandResult, Context},
    sale_service::{collect_sale_lines, format_sale_report},
};

/// Manually check for sales on currently suggested games.
#[poise::command(slash_command)]
pub async fn sales(ctx: Context<'_>) -> CommandResult {
    info!("{} manually triggered a sale check", ctx.author().name);
    ctx.defer().await?;

    let state = ctx.data();
    let lines = collect_sale_lines(&state.suggestion_repository, &state.cheapshark)
        .await
        .map_err(|err| internal_err(format!("Could not run the sale check: {err}")))?;
    let report = format_sale_report(&lines);

    match state.sales_channel.say(ctx.serenity_context(), &report).await {
        Ok(_) => {
            ctx.say("💸 Sale check complete.").await?;
        }
        Err(err) => {
            warn!("Could not post to the sales channel: {err}");
            ctx.say(report).await?;
        }
    }

    Ok(())
}
