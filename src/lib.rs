#![forbid(unsafe_code)]

pub mod auth;
pub mod commands;
pub mod config;
pub mod lookup;
pub mod models;
pub mod poise_error_handler;
pub mod repository;
pub mod sale_service;
pub mod utils;
pub mod web;

use std::sync::Arc;

use poise::serenity_prelude::ChannelId;

use auth::Authorizer;
use lookup::{CheapSharkClient, IgdbClient};
use repository::{PickRepository, SuggestionRepository};

pub struct BotState {
    pub suggestion_repository: Arc<SuggestionRepository>,
    pub pick_repository: Arc<PickRepository>,
    pub igdb: Arc<IgdbClient>,
    pub cheapshark: Arc<CheapSharkClient>,
    pub authorizer: Authorizer,
    pub announcement_channel: ChannelId,
    pub sales_channel: ChannelId,
}
