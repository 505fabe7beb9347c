mod cheapshark;
mod igdb;

pub use cheapshark::{discount_percent, redirect_url, CheapSharkClient, DealInfo, GameMatch};
pub use igdb::{GameMetadata, GameQuery, IgdbClient};

use thiserror::Error;

/// Failures talking to the external metadata and deal collaborators.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Upstream returned malformed data: {0}")]
    Malformed(String),
}
