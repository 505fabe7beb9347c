use poise::serenity_prelude::UserId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SuggestionId(pub u64);

/// An active suggestion: proposed but not yet picked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    pub id: SuggestionId,
    pub submitter: UserId,
    pub submitter_name: String,
    pub game_name: String,
    pub genres: String,
    pub release_date: String,
    pub summary: String,
    pub url: String,
}

#[derive(Clone, Debug)]
pub struct NewSuggestion {
    pub submitter: UserId,
    pub submitter_name: String,
    pub game_name: String,
    pub genres: String,
    pub release_date: String,
    pub summary: String,
    pub url: String,
}
