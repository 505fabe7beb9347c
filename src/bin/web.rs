#![forbid(unsafe_code)]

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use game_club_bot::{
    config::WebConfig,
    repository::{PickRepository, SuggestionRepository},
    web::{self, WebState},
};

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        warn!("Could not load config from .env file: {err}");
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(
                    "game_club_bot=info"
                        .parse()
                        .expect("Hard-coded default directive should be correct"),
                )
                .from_env_lossy(),
        )
        .init();

    let config = envy::from_env::<WebConfig>().context("Could not load web config")?;

    info!("Connecting to SQLite database at {}", config.database_url);
    let pool = SqlitePoolOptions::new()
        .connect(&config.database_url)
        .await
        .context("Connecting to the database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Running migrations")?;

    let state = WebState {
        suggestion_repository: Arc::new(SuggestionRepository::new(pool.clone())),
        pick_repository: Arc::new(PickRepository::new(pool)),
    };
    let app = web::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.web_port.unwrap_or(DEFAULT_PORT)));
    info!("Starting the presentation server on {addr}");

    let listener = TcpListener::bind(addr).await.context("Binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Serving the presentation pages")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
