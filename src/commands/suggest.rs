use std::time::{Duration, Instant};

use poise::{
    serenity_prelude::{
        ButtonStyle, ComponentInteractionCollector, CreateActionRow, CreateButton, CreateEmbed,
        CreateInteractionResponse, CreateInteractionResponseMessage, Mentionable,
    },
    CreateReply,
};
use tracing::info;

use crate::{
    commands::{duplicate, internal_err, not_found, CommandError, CommandResult, Context},
    lookup::{GameMetadata, GameQuery},
    models::NewSuggestion,
    utils::formatting::truncate_summary,
};

const CONFIRM_TIMEOUT: Duration = Duration::from_secs(5);
const SUMMARY_PREVIEW_CHARS: usize = 300;

/// How a pending suggestion preview was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConfirmDecision {
    Confirmed,
    Cancelled,
    TimedOut,
}

impl ConfirmDecision {
    /// No response counts as confirmation; only an explicit cancel drops the
    /// suggestion.
    fn persists(self) -> bool {
        !matches!(self, ConfirmDecision::Cancelled)
    }
}

/// Suggest a game for the club. Shows a preview to confirm or cancel first.
#[poise::command(slash_command)]
pub async fn suggest(
    ctx: Context<'_>,
    #[description = "Game name or IGDB URL"] game: String,
) -> CommandResult {
    let state = ctx.data();
    info!("{} suggested: {}", ctx.author().name, game);

    let query = GameQuery::parse(&game);
    ctx.say(format!("🔍 Looking up **{}**...", query.display()))
        .await?;

    let metadata = state
        .igdb
        .lookup(&query)
        .await?
        .ok_or_else(|| not_found("❌ Game not found on IGDB."))?;

    let conflict = state
        .suggestion_repository
        .find_by_name(&metadata.name)
        .await
        .map_err(|err| internal_err(format!("Could not check for duplicates: {err}")))?;

    if conflict.is_some() {
        return Err(duplicate(format!(
            "⚠️ **{}** has already been suggested.",
            metadata.name
        )));
    }

    let embed = preview_embed(&metadata);
    let accept_id = format!("{}-accept", ctx.id());
    let cancel_id = format!("{}-cancel", ctx.id());

    let buttons = CreateActionRow::Buttons(vec![
        CreateButton::new(accept_id.clone())
            .label("✅ Accept")
            .style(ButtonStyle::Success),
        CreateButton::new(cancel_id.clone())
            .label("❌ Cancel")
            .style(ButtonStyle::Danger),
    ]);

    let preview = ctx
        .send(
            CreateReply::default()
                .content(format!(
                    "📝 {} suggested a game — confirm below:",
                    ctx.author().mention()
                ))
                .embed(embed.clone())
                .components(vec![buttons]),
        )
        .await?;

    let decision = wait_for_decision(ctx, &accept_id, &cancel_id).await?;

    if !decision.persists() {
        preview.delete(ctx).await?;
        ctx.say("❌ Suggestion cancelled.").await?;
        return Ok(());
    }

    let suggestion = NewSuggestion {
        submitter: ctx.author().id,
        submitter_name: ctx.author().name.clone(),
        game_name: metadata.name.clone(),
        genres: metadata.genres.clone(),
        release_date: metadata.release_date.clone(),
        summary: metadata.summary.clone(),
        url: metadata.url.clone(),
    };

    state
        .suggestion_repository
        .add(&suggestion)
        .await
        .map_err(|err| internal_err(format!("Could not store the suggestion: {err}")))?;

    preview
        .edit(
            ctx,
            CreateReply::default()
                .content(format!(
                    "✅ **[{}]({})** successfully added by {}!",
                    metadata.name,
                    metadata.url,
                    ctx.author().mention()
                ))
                .embed(embed)
                .components(vec![]),
        )
        .await?;

    Ok(())
}

/// Waits up to the confirmation timeout for the requester to press a button.
/// Presses by anyone else are rejected without affecting the pending state.
async fn wait_for_decision(
    ctx: Context<'_>,
    accept_id: &str,
    cancel_id: &str,
) -> Result<ConfirmDecision, CommandError> {
    let deadline = Instant::now() + CONFIRM_TIMEOUT;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(ConfirmDecision::TimedOut);
        }

        let filter_accept = accept_id.to_string();
        let filter_cancel = cancel_id.to_string();

        let Some(press) = ComponentInteractionCollector::new(ctx.serenity_context())
            .timeout(remaining)
            .filter(move |press| {
                press.data.custom_id == filter_accept || press.data.custom_id == filter_cancel
            })
            .await
        else {
            return Ok(ConfirmDecision::TimedOut);
        };

        if !ctx
            .data()
            .authorizer
            .may_resolve_suggestion(ctx.author().id, press.user.id)
        {
            press
                .create_response(
                    ctx.serenity_context(),
                    CreateInteractionResponse::Message(
                        CreateInteractionResponseMessage::new()
                            .content("You can't act on someone else's suggestion.")
                            .ephemeral(true),
                    ),
                )
                .await?;
            continue;
        }

        press
            .create_response(
                ctx.serenity_context(),
                CreateInteractionResponse::Acknowledge,
            )
            .await?;

        if press.data.custom_id == accept_id {
            return Ok(ConfirmDecision::Confirmed);
        }
        return Ok(ConfirmDecision::Cancelled);
    }
}

fn preview_embed(metadata: &GameMetadata) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(metadata.name.clone())
        .url(metadata.url.clone())
        .description(truncate_summary(&metadata.summary, SUMMARY_PREVIEW_CHARS))
        .field("Genres", metadata.genres.clone(), false)
        .field("Release Date", metadata.release_date.clone(), false);

    if let Some(cover_url) = &metadata.cover_url {
        embed = embed.thumbnail(cover_url.clone());
    }

    embed
}

#[cfg(test)]
mod tests {
    use super::ConfirmDecision;

    #[test]
    fn confirmation_persists() {
        assert!(ConfirmDecision::Confirmed.persists());
    }

    #[test]
    fn timeout_persists_like_confirmation() {
        assert!(ConfirmDecision::TimedOut.persists());
    }

    #[test]
    fn cancellation_never_persists() {
        assert!(!ConfirmDecision::Cancelled.persists());
    }
}
