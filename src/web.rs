use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::{
    models::{ArchivedPick, Suggestion},
    repository::{PickRepository, SuggestionRepository},
    utils::formatting::humanize_release_date,
};

/// Read-only state shared by the presentation handlers.
#[derive(Clone)]
pub struct WebState {
    pub suggestion_repository: Arc<SuggestionRepository>,
    pub pick_repository: Arc<PickRepository>,
}

pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/games", get(games))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The pick presently in play.
async fn home(State(state): State<WebState>) -> Result<Html<String>, WebError> {
    let pick = state.pick_repository.current().await?;
    Ok(Html(render_home(pick.as_ref())))
}

/// The suggestion backlog, newest first.
async fn games(State(state): State<WebState>) -> Result<Html<String>, WebError> {
    let backlog = state
        .suggestion_repository
        .list_active_newest_first()
        .await?;
    Ok(Html(render_games(&backlog)))
}

struct WebError(anyhow::Error);

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
    }
}

impl<E> From<E> for WebError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> WebError {
        WebError(err.into())
    }
}

fn render_home(pick: Option<&ArchivedPick>) -> String {
    let body = match pick {
        Some(pick) => format!(
            "<section>\n\
             <h2><a href=\"{url}\">{name}</a></h2>\n\
             <p class=\"meta\">Suggested by {submitter} · {genres} · Released {release}</p>\n\
             <p>{summary}</p>\n\
             </section>",
            url = escape_html(&pick.url),
            name = escape_html(&pick.game_name),
            submitter = escape_html(&pick.submitter_name),
            genres = escape_html(&pick.genres),
            release = escape_html(&humanize_release_date(&pick.release_date)),
            summary = escape_html(&pick.summary),
        ),
        None => "<p>No game has been picked yet.</p>".to_string(),
    };

    page(
        "Game Club",
        &format!(
            "<h1>🎮 Current Game</h1>\n{body}\n<p><a href=\"/games\">View the suggestion backlog</a></p>"
        ),
    )
}

fn render_games(backlog: &[Suggestion]) -> String {
    let body = if backlog.is_empty() {
        "<p>No games have been suggested yet.</p>".to_string()
    } else {
        let items: String = backlog
            .iter()
            .map(|suggestion| {
                format!(
                    "<li><a href=\"{url}\">{name}</a> — suggested by {submitter} ({genres}, {release})</li>\n",
                    url = escape_html(&suggestion.url),
                    name = escape_html(&suggestion.game_name),
                    submitter = escape_html(&suggestion.submitter_name),
                    genres = escape_html(&suggestion.genres),
                    release = escape_html(&humanize_release_date(&suggestion.release_date)),
                )
            })
            .collect();

        format!("<ul>\n{items}</ul>")
    };

    page(
        "Suggested Games",
        &format!("<h1>🗃️ Suggested Games</h1>\n{body}\n<p><a href=\"/\">Back to the current game</a></p>"),
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
