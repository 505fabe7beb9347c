mod archived_pick;
mod suggestion;

pub use archived_pick::ArchivedPick;
pub use suggestion::{NewSuggestion, Suggestion, SuggestionId};
