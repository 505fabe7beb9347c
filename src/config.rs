use serde::Deserialize;

pub const DEFAULT_SALE_CHECK_HOUR_UTC: u8 = 12;

/// Bot process configuration, deserialized from environment variables.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub discord_bot_token: String,
    pub database_url: String,
    pub igdb_client_id: String,
    pub igdb_client_secret: String,
    pub owner_user_id: u64,
    pub announcement_channel_id: u64,
    pub sales_channel_id: u64,
    /// Hour (UTC) of the daily sale check. Defaults to noon.
    pub sale_check_hour_utc: Option<u8>,
    /// Debug toggle: run the sale check on every scheduler tick instead of daily.
    pub sale_check_every_tick: Option<bool>,
    pub register_commands_globally: Option<bool>,
    pub register_commands_in_guilds: Option<Vec<u64>>,
}

/// Presentation process configuration. Read-only against the same database.
#[derive(Debug, Deserialize)]
pub struct WebConfig {
    pub database_url: String,
    pub web_port: Option<u16>,
}
