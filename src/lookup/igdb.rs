use indoc::formatdoc;
use lazy_regex::regex_captures;
use reqwest::Client;
use serde::Deserialize;
use time::{macros::format_description, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::LookupError;

const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
const GAMES_URL: &str = "https://api.igdb.com/v4/games";
const TIME_TO_BEAT_URL: &str = "https://api.igdb.com/v4/game_time_to_beats";
const SITE_URL: &str = "https://www.igdb.com";
const COVER_URL_PREFIX: &str = "https://images.igdb.com/igdb/image/upload/t_cover_big/";

/// Game metadata lookup backed by IGDB. The bearer token comes from a Twitch
/// client-credentials exchange and is cached for the process lifetime; only a
/// restart drops it.
pub struct IgdbClient {
    http: Client,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<String>>,
}

/// How to resolve a user's input: an exact slug taken from an IGDB URL, or a
/// free-text search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameQuery {
    Slug(String),
    Search(String),
}

impl GameQuery {
    pub fn parse(input: &str) -> GameQuery {
        let input = input.trim();

        match regex_captures!(r"^https?://www\.igdb\.com/games/([\w-]+)", input) {
            Some((_, slug)) => GameQuery::Slug(slug.to_string()),
            None => GameQuery::Search(input.to_string()),
        }
    }

    /// The value shown back to the user while looking it up.
    pub fn display(&self) -> &str {
        match self {
            GameQuery::Slug(slug) => slug,
            GameQuery::Search(text) => text,
        }
    }

    fn to_request_body(&self) -> String {
        match self {
            GameQuery::Slug(slug) => formatdoc! {
                r#"
                    fields name, genres.name, summary, url, first_release_date, cover.image_id;
                    where slug = "{slug}";
                    limit 1;
                "#,
                slug = sanitize_query_value(slug),
            },
            GameQuery::Search(text) => formatdoc! {
                r#"
                    fields name, genres.name, summary, url, first_release_date, cover.image_id;
                    search "{text}";
                    limit 1;
                "#,
                text = sanitize_query_value(text),
            },
        }
    }
}

/// Resolved metadata, already rendered into the textual shape the store keeps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameMetadata {
    pub name: String,
    pub genres: String,
    pub summary: String,
    pub release_date: String,
    pub url: String,
    pub cover_url: Option<String>,
}

impl IgdbClient {
    pub fn new(client_id: String, client_secret: String) -> IgdbClient {
        IgdbClient {
            http: Client::new(),
            client_id,
            client_secret,
            token: Mutex::new(None),
        }
    }

    /// Resolves a query to at most one game.
    pub async fn lookup(&self, query: &GameQuery) -> Result<Option<GameMetadata>, LookupError> {
        debug!("Querying IGDB for {:?}", query);

        let games = self.games_request(query.to_request_body()).await?;
        Ok(games.into_iter().next().map(GameMetadata::from))
    }

    /// Best-effort completion estimate in hours, via the `normally` figure of
    /// IGDB's time-to-beat endpoint.
    pub async fn time_to_beat_hours(&self, game_name: &str) -> Result<Option<u32>, LookupError> {
        let search_body = formatdoc! {
            r#"
                fields id, name;
                search "{name}";
                limit 1;
            "#,
            name = sanitize_query_value(game_name),
        };

        let Some(game_id) = self
            .games_request(search_body)
            .await?
            .into_iter()
            .next()
            .and_then(|game| game.id)
        else {
            return Ok(None);
        };

        let token = self.token().await?;
        let body = format!("fields normally; where game_id = {game_id};");
        let response = self
            .http
            .post(TIME_TO_BEAT_URL)
            .header("Client-ID", &self.client_id)
            .bearer_auth(&token)
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        let estimates: Vec<IgdbTimeToBeat> = response
            .json()
            .await
            .map_err(|err| LookupError::Malformed(err.to_string()))?;

        let normally_seconds = estimates.into_iter().next().and_then(|ttb| ttb.normally);
        Ok(normally_seconds.map(|seconds| (f64::from(seconds) / 3600.0).round() as u32))
    }

    async fn games_request(&self, body: String) -> Result<Vec<IgdbGame>, LookupError> {
        let token = self.token().await?;

        let response = self
            .http
            .post(GAMES_URL)
            .header("Client-ID", &self.client_id)
            .bearer_auth(&token)
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        response
            .json()
            .await
            .map_err(|err| LookupError::Malformed(err.to_string()))
    }

    async fn token(&self) -> Result<String, LookupError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        debug!("Requesting new IGDB token");
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|err| LookupError::Malformed(err.to_string()))?;

        info!("Received new IGDB token");
        *cached = Some(token_response.access_token.clone());
        Ok(token_response.access_token)
    }
}

/// IGDB body strings are double-quoted; strip characters that would break out.
fn sanitize_query_value(value: &str) -> String {
    value.replace(['"', '\\'], "")
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct IgdbGame {
    id: Option<u64>,
    name: Option<String>,
    summary: Option<String>,
    url: Option<String>,
    first_release_date: Option<i64>,
    genres: Option<Vec<IgdbGenre>>,
    cover: Option<IgdbCover>,
}

#[derive(Debug, Deserialize)]
struct IgdbGenre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct IgdbCover {
    image_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IgdbTimeToBeat {
    normally: Option<u32>,
}

impl From<IgdbGame> for GameMetadata {
    fn from(game: IgdbGame) -> GameMetadata {
        let genres = match game.genres {
            Some(genres) if !genres.is_empty() => genres
                .into_iter()
                .map(|genre| genre.name)
                .collect::<Vec<_>>()
                .join(", "),
            _ => "N/A".to_string(),
        };

        let url = match game.url {
            Some(url) if url.starts_with('/') => format!("{SITE_URL}{url}"),
            Some(url) => url,
            None => SITE_URL.to_string(),
        };

        let cover_url = game
            .cover
            .and_then(|cover| cover.image_id)
            .map(|image_id| format!("{COVER_URL_PREFIX}{image_id}.jpg"));

        GameMetadata {
            name: game.name.unwrap_or_else(|| "Unknown".to_string()),
            genres,
            summary: game
                .summary
                .unwrap_or_else(|| "No summary provided.".to_string()),
            release_date: format_release_date(game.first_release_date),
            url,
            cover_url,
        }
    }
}

fn format_release_date(unix_timestamp: Option<i64>) -> String {
    let format = format_description!("[year]-[month]-[day]");

    unix_timestamp
        .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok())
        .and_then(|date| date.format(format).ok())
        .unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_input_parses_to_a_slug() {
        assert_eq!(
            GameQuery::parse("https://www.igdb.com/games/outer-wilds"),
            GameQuery::Slug("outer-wilds".to_string()),
        );
        assert_eq!(
            GameQuery::parse("  http://www.igdb.com/games/hades  "),
            GameQuery::Slug("hades".to_string()),
        );
    }

    #[test]
    fn free_text_parses_to_a_search() {
        assert_eq!(
            GameQuery::parse("  Outer Wilds "),
            GameQuery::Search("Outer Wilds".to_string()),
        );
        // Other sites are not slug sources.
        assert_eq!(
            GameQuery::parse("https://store.steampowered.com/app/753640"),
            GameQuery::Search("https://store.steampowered.com/app/753640".to_string()),
        );
    }

    #[test]
    fn query_values_are_sanitized() {
        let body = GameQuery::Search(r#"Game "quoted" \ name"#.to_string()).to_request_body();
        assert!(body.contains(r#"search "Game quoted  name";"#));
    }

    #[test]
    fn full_record_maps_to_metadata() {
        let game: IgdbGame = serde_json::from_value(json!({
            "id": 7346,
            "name": "Overwatch",
            "summary": "A team shooter.",
            "url": "/games/overwatch",
            "first_release_date": 1462838400i64,
            "genres": [{"name": "Shooter"}, {"name": "Action"}],
            "cover": {"image_id": "co1mvv"},
        }))
        .unwrap();

        let metadata = GameMetadata::from(game);
        assert_eq!(metadata.name, "Overwatch");
        assert_eq!(metadata.genres, "Shooter, Action");
        assert_eq!(metadata.release_date, "2016-05-10");
        assert_eq!(metadata.url, "https://www.igdb.com/games/overwatch");
        assert_eq!(
            metadata.cover_url.as_deref(),
            Some("https://images.igdb.com/igdb/image/upload/t_cover_big/co1mvv.jpg"),
        );
    }

    #[test]
    fn sparse_record_degrades_to_placeholders() {
        let game: IgdbGame = serde_json::from_value(json!({"id": 1})).unwrap();

        let metadata = GameMetadata::from(game);
        assert_eq!(metadata.name, "Unknown");
        assert_eq!(metadata.genres, "N/A");
        assert_eq!(metadata.summary, "No summary provided.");
        assert_eq!(metadata.release_date, "Unknown");
        assert_eq!(metadata.url, "https://www.igdb.com");
        assert_eq!(metadata.cover_url, None);
    }
}
