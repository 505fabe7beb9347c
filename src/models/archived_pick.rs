use poise::serenity_prelude::UserId;

use super::SuggestionId;

/// A suggestion that has been picked. Kept forever; `id` is the id of the
/// original suggestion it was promoted from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchivedPick {
    pub id: SuggestionId,
    pub submitter: UserId,
    pub submitter_name: String,
    pub game_name: String,
    pub genres: String,
    pub release_date: String,
    pub summary: String,
    pub url: String,
}
