use poise::{serenity_prelude::CreateEmbed, CreateReply};

use crate::commands::{CommandResult, Context};

/// List the club commands.
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> CommandResult {
    let embed = CreateEmbed::new()
        .title("Bot Help")
        .description("List of commands:")
        .field(
            "🎮 Game Suggestions",
            "`/suggest <game name or IGDB URL>` – Suggest a game for the club.\n\
             You'll get a preview to confirm or cancel before it's added.",
            false,
        )
        .field(
            "🗃️ Viewing Suggestions",
            "`/listgames` – View all currently suggested games.\n\
             `/listpastgames` – View games that have been picked in the past.",
            false,
        )
        .field(
            "🎲 Game Selection",
            "`/pick_next` – (Owner only) Picks the next game from the queue using round-robin.\n\
             Automatically announces it and updates the site.",
            false,
        )
        .field(
            "💸 Game Sales",
            "`/sales` – Manually check for sales on currently suggested games.\n\
             This also runs daily at noon automatically.",
            false,
        );

    ctx.send(CreateReply::default().embed(embed)).await?;

    Ok(())
}
