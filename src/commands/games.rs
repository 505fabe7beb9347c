use tracing::info;

use crate::commands::{internal_err, CommandResult, Context};

// Discord message length limits; long listings go out in chunks.
const LINES_PER_MESSAGE: usize = 20;

/// View all currently suggested games, in submission order.
#[poise::command(slash_command)]
pub async fn listgames(ctx: Context<'_>) -> CommandResult {
    info!("{} requested the list of suggested games", ctx.author().name);

    let suggestions = ctx
        .data()
        .suggestion_repository
        .list_active()
        .await
        .map_err(|err| internal_err(format!("Could not retrieve the game list: {err}")))?;

    if suggestions.is_empty() {
        ctx.say("📭 No games have been suggested yet.").await?;
        return Ok(());
    }

    let lines: Vec<String> = suggestions
        .iter()
        .map(|s| format!("**{}**: {}", s.submitter_name, s.game_name))
        .collect();

    for chunk in chunk_lines(&lines, LINES_PER_MESSAGE) {
        ctx.say(chunk).await?;
    }

    Ok(())
}

/// View games that have been picked in the past, most recent first.
#[poise::command(slash_command)]
pub async fn listpastgames(ctx: Context<'_>) -> CommandResult {
    info!("{} requested the list of archived games", ctx.author().name);

    let picks = ctx
        .data()
        .pick_repository
        .list_archived()
        .await
        .map_err(|err| internal_err(format!("Could not retrieve the archived games: {err}")))?;

    if picks.is_empty() {
        ctx.say("📦 No archived games yet.").await?;
        return Ok(());
    }

    let lines: Vec<String> = picks
        .iter()
        .map(|p| format!("**{}**: {}", p.submitter_name, p.game_name))
        .collect();

    for chunk in chunk_lines(&lines, LINES_PER_MESSAGE) {
        ctx.say(chunk).await?;
    }

    Ok(())
}

fn chunk_lines(lines: &[String], chunk_size: usize) -> Vec<String> {
    lines
        .chunks(chunk_size)
        .map(|chunk| chunk.join("\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_listings_fit_one_message() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(chunk_lines(&lines, 20), vec!["a\nb"]);
    }

    #[test]
    fn long_listings_are_split() {
        let lines: Vec<String> = (0..45).map(|i| i.to_string()).collect();
        let chunks = chunk_lines(&lines, 20);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].lines().count(), 20);
        assert_eq!(chunks[2].lines().count(), 5);
        assert!(chunks[0].starts_with("0\n1\n"));
        assert!(chunks[2].ends_with("44"));
    }
}
