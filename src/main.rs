#![forbid(unsafe_code)]

use std::{process::exit, sync::Arc};

use poise::{serenity_prelude::*, Framework};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tokio::{select, signal, sync::Notify};
use tracing::{error, info, info_span, warn, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use game_club_bot::{
    auth::Authorizer,
    commands,
    config::{AppConfig, DEFAULT_SALE_CHECK_HOUR_UTC},
    lookup::{CheapSharkClient, IgdbClient},
    poise_error_handler::handle_error,
    repository::{PickRepository, SuggestionRepository},
    sale_service::{SaleCheckService, SaleSchedule},
    BotState,
};

#[tokio::main]
async fn main() {
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

    let app_config = match envy::from_env::<AppConfig>() {
        Ok(config) => config,
        Err(err) => {
            error!("Could not load app config: {err}");
            exit(255);
        }
    };

    let db_pool = match setup_database(&app_config.database_url).await {
        Ok(pool) => pool,
        Err(err) => {
            error!("Could not setup database: {err}");
            exit(255);
        }
    };

    let shutdown_notify = Arc::new(Notify::new());
    let sale_check_shutdown = shutdown_notify.clone();

    let sale_schedule = SaleSchedule {
        hour_utc: app_config
            .sale_check_hour_utc
            .unwrap_or(DEFAULT_SALE_CHECK_HOUR_UTC),
        every_tick: app_config.sale_check_every_tick.unwrap_or(false),
    };
    let sales_channel = ChannelId::new(app_config.sales_channel_id);

    let app_state = BotState {
        suggestion_repository: Arc::new(SuggestionRepository::new(db_pool.clone())),
        pick_repository: Arc::new(PickRepository::new(db_pool.clone())),
        igdb: Arc::new(IgdbClient::new(
            app_config.igdb_client_id.clone(),
            app_config.igdb_client_secret.clone(),
        )),
        cheapshark: Arc::new(CheapSharkClient::new()),
        authorizer: Authorizer::new(UserId::new(app_config.owner_user_id)),
        announcement_channel: ChannelId::new(app_config.announcement_channel_id),
        sales_channel,
    };

    let framework = Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::suggest(),
                commands::listgames(),
                commands::listpastgames(),
                commands::pick_next(),
                commands::sales(),
                commands::help(),
            ],
            on_error: |error| Box::pin(handle_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(
                async move {
                    let commands = &framework.options().commands;

                    if let Some(true) = app_config.register_commands_globally {
                        info!("Registering commands globally");
                        poise::builtins::register_globally(ctx, commands).await?;
                    }

                    if let Some(guilds) = app_config.register_commands_in_guilds {
                        for guild in guilds.iter().map(|g| GuildId::new(*g)) {
                            let guild_name = ctx
                                .http()
                                .get_guild(guild)
                                .await
                                .map(|g| g.name)
                                .unwrap_or("???".to_string());

                            info!("Registering commands in guild {guild} ({guild_name})");

                            poise::builtins::register_in_guild(ctx, commands, guild).await?;
                        }
                    }

                    SaleCheckService::create_and_start(
                        sale_check_shutdown,
                        ctx.http.clone(),
                        app_state.suggestion_repository.clone(),
                        app_state.cheapshark.clone(),
                        sales_channel,
                        sale_schedule,
                    );

                    Ok(app_state)
                }
                .instrument(info_span!("bot_setup")),
            )
        })
        .build();

    let mut client = match ClientBuilder::new(app_config.discord_bot_token, GatewayIntents::empty())
        .framework(framework)
        .await
    {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to create the client: {err}");
            exit(255);
        }
    };

    select! {
        _ = signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
            shutdown_notify.notify_waiters();
            client.shard_manager.shutdown_all().await;
            db_pool.close().await;
        },

        result = client.start() => {
            if let Err(err) = result {
                error!("Failed to start the client: {err}");
            }
        },
    };
}

#[tracing::instrument(skip(url))]
async fn setup_database(url: &str) -> anyhow::Result<SqlitePool> {
    info!("Connecting to SQLite database at {url}");
    let pool = SqlitePoolOptions::new().connect(url).await?;
    info!("Running migrations");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Done!");
    Ok(pool)
}
