use poise::serenity_prelude::UserId;
use sqlx::{query, query_as, Pool, Sqlite};

use crate::{
    models::{ArchivedPick, SuggestionId},
    repository::conversion::DBConvertible,
};

use super::{conversion::DBFromConversionError, suggestion_repository::SqlSuggestion};

pub struct PickRepository {
    pool: Pool<Sqlite>,
}

impl PickRepository {
    pub fn new(pool: Pool<Sqlite>) -> PickRepository {
        PickRepository { pool }
    }

    /// Promotes the next suggestion to the current pick, round-robin by
    /// submitter: the earliest suggestion whose submitter has not been picked
    /// this cycle, resetting the cycle once every known submitter is exhausted.
    ///
    /// Archiving, replacing the current pick, marking the submitter, and
    /// removing the suggestion happen in a single transaction.
    pub async fn pick_next(&self) -> Result<Option<ArchivedPick>, anyhow::Error> {
        let mut transaction = self.pool.begin().await?;

        let next = query_as::<_, SqlSuggestion>(
            r#"
                SELECT id, submitter_id, submitter_name, game_name, genres, release_date, summary, url
                FROM suggestions
                WHERE submitter_id NOT IN (SELECT submitter_id FROM picked_users)
                ORDER BY id
                LIMIT 1
            "#,
        )
        .fetch_optional(&mut *transaction)
        .await?;

        let next = match next {
            Some(row) => Some(row),

            // Every current submitter already had a pick this cycle.
            // Reset the cycle and take the earliest suggestion overall.
            None => {
                query("DELETE FROM picked_users")
                    .execute(&mut *transaction)
                    .await?;

                query_as::<_, SqlSuggestion>(
                    r#"
                        SELECT id, submitter_id, submitter_name, game_name, genres, release_date, summary, url
                        FROM suggestions
                        ORDER BY id
                        LIMIT 1
                    "#,
                )
                .fetch_optional(&mut *transaction)
                .await?
            }
        };

        let Some(row) = next else {
            transaction.rollback().await?;
            return Ok(None);
        };

        query(
            r#"
                INSERT INTO archived_picks (id, submitter_id, submitter_name, game_name, genres, release_date, summary, url)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(row.id)
        .bind(row.submitter_id)
        .bind(&row.submitter_name)
        .bind(&row.game_name)
        .bind(&row.genres)
        .bind(&row.release_date)
        .bind(&row.summary)
        .bind(&row.url)
        .execute(&mut *transaction)
        .await?;

        query("DELETE FROM current_pick")
            .execute(&mut *transaction)
            .await?;
        query("INSERT INTO current_pick (id, archived_pick_id) VALUES (1, $1)")
            .bind(row.id)
            .execute(&mut *transaction)
            .await?;

        query("INSERT INTO picked_users (submitter_id) VALUES ($1) ON CONFLICT (submitter_id) DO NOTHING")
            .bind(row.submitter_id)
            .execute(&mut *transaction)
            .await?;

        query("DELETE FROM suggestions WHERE id = $1")
            .bind(row.id)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;

        let archived = SqlArchivedPick {
            id: row.id,
            submitter_id: row.submitter_id,
            submitter_name: row.submitter_name,
            game_name: row.game_name,
            genres: row.genres,
            release_date: row.release_date,
            summary: row.summary,
            url: row.url,
        };

        Ok(Some(ArchivedPick::from_db(&archived)?))
    }

    /// The pick presently in play, if any.
    pub async fn current(&self) -> Result<Option<ArchivedPick>, anyhow::Error> {
        let row = query_as::<_, SqlArchivedPick>(
            r#"
                SELECT ap.id, ap.submitter_id, ap.submitter_name, ap.game_name,
                       ap.genres, ap.release_date, ap.summary, ap.url
                FROM current_pick cp
                JOIN archived_picks ap ON cp.archived_pick_id = ap.id
                LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(ArchivedPick::from_db(&row)?)),
            None => Ok(None),
        }
    }

    /// Every past pick, most recent first.
    pub async fn list_archived(&self) -> Result<Vec<ArchivedPick>, anyhow::Error> {
        let rows = query_as::<_, SqlArchivedPick>(
            r#"
                SELECT id, submitter_id, submitter_name, game_name, genres, release_date, summary, url
                FROM archived_picks
                ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Ok(ArchivedPick::from_db(row)?))
            .collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct SqlArchivedPick {
    pub(crate) id: i64,
    pub(crate) submitter_id: i64,
    pub(crate) submitter_name: String,
    pub(crate) game_name: String,
    pub(crate) genres: String,
    pub(crate) release_date: String,
    pub(crate) summary: String,
    pub(crate) url: String,
}

impl DBConvertible for ArchivedPick {
    type DBType = SqlArchivedPick;

    fn to_db(&self) -> Self::DBType {
        SqlArchivedPick {
            id: self.id.to_db(),
            submitter_id: self.submitter.to_db(),
            submitter_name: self.submitter_name.clone(),
            game_name: self.game_name.clone(),
            genres: self.genres.clone(),
            release_date: self.release_date.clone(),
            summary: self.summary.clone(),
            url: self.url.clone(),
        }
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(ArchivedPick {
            id: SuggestionId::from_db(&value.id)?,
            submitter: UserId::from_db(&value.submitter_id)?,
            submitter_name: value.submitter_name.clone(),
            game_name: value.game_name.clone(),
            genres: value.genres.clone(),
            release_date: value.release_date.clone(),
            summary: value.summary.clone(),
            url: value.url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::NewSuggestion,
        repository::{test_utils::memory_pool, SuggestionRepository},
    };

    async fn repos() -> (SuggestionRepository, PickRepository) {
        let pool = memory_pool().await;
        (
            SuggestionRepository::new(pool.clone()),
            PickRepository::new(pool),
        )
    }

    fn new_suggestion(submitter: u64, game_name: &str) -> NewSuggestion {
        NewSuggestion {
            submitter: UserId::new(submitter),
            submitter_name: format!("user-{submitter}"),
            game_name: game_name.to_string(),
            genres: "Adventure".to_string(),
            release_date: "Unknown".to_string(),
            summary: "Summary.".to_string(),
            url: "https://www.igdb.com/games/example".to_string(),
        }
    }

    #[test_log::test(tokio::test)]
    async fn nothing_to_pick_from_an_empty_store() {
        let (_, picks) = repos().await;

        assert!(picks.pick_next().await.unwrap().is_none());
        assert!(picks.current().await.unwrap().is_none());
        assert!(picks.list_archived().await.unwrap().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn round_robin_across_submitters() {
        let (suggestions, picks) = repos().await;

        // Submission order: A, A, B.
        suggestions.add(&new_suggestion(1, "First A")).await.unwrap();
        suggestions.add(&new_suggestion(1, "Second A")).await.unwrap();
        suggestions.add(&new_suggestion(2, "First B")).await.unwrap();

        // A's earliest suggestion goes first.
        let first = picks.pick_next().await.unwrap().unwrap();
        assert_eq!(first.game_name, "First A");

        // A is excluded until the cycle resets, so B is next.
        let second = picks.pick_next().await.unwrap().unwrap();
        assert_eq!(second.game_name, "First B");

        // No un-picked submitter remains: the cycle resets and A's
        // remaining suggestion is selected.
        let third = picks.pick_next().await.unwrap().unwrap();
        assert_eq!(third.game_name, "Second A");

        assert!(picks.pick_next().await.unwrap().is_none());
    }

    #[test_log::test(tokio::test)]
    async fn pick_moves_the_suggestion_to_the_archive() {
        let (suggestions, picks) = repos().await;

        suggestions.add(&new_suggestion(1, "Hades")).await.unwrap();
        suggestions.add(&new_suggestion(2, "Celeste")).await.unwrap();

        let picked = picks.pick_next().await.unwrap().unwrap();
        assert_eq!(picked.game_name, "Hades");

        let active: Vec<_> = suggestions
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.game_name)
            .collect();
        assert_eq!(active, vec!["Celeste"]);

        let archived = picks.list_archived().await.unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].game_name, "Hades");
    }

    #[test_log::test(tokio::test)]
    async fn current_pick_is_replaced_not_appended() {
        let (suggestions, picks) = repos().await;

        suggestions.add(&new_suggestion(1, "Hades")).await.unwrap();
        suggestions.add(&new_suggestion(2, "Celeste")).await.unwrap();

        picks.pick_next().await.unwrap().unwrap();
        assert_eq!(picks.current().await.unwrap().unwrap().game_name, "Hades");

        picks.pick_next().await.unwrap().unwrap();
        assert_eq!(picks.current().await.unwrap().unwrap().game_name, "Celeste");

        // The archive keeps both, most recent first.
        let archived: Vec<_> = picks
            .list_archived()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.game_name)
            .collect();
        assert_eq!(archived, vec!["Celeste", "Hades"]);
    }

    #[test_log::test(tokio::test)]
    async fn failed_pick_leaves_the_store_untouched() {
        let (suggestions, picks) = repos().await;

        suggestions.add(&new_suggestion(1, "Hades")).await.unwrap();
        picks.pick_next().await.unwrap().unwrap();

        // Nothing left: the reset path runs but commits no pick.
        assert!(picks.pick_next().await.unwrap().is_none());
        assert_eq!(picks.list_archived().await.unwrap().len(), 1);
        assert_eq!(picks.current().await.unwrap().unwrap().game_name, "Hades");
    }
}
