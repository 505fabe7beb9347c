use poise::serenity_prelude::UserId;
use sqlx::{query_as, Pool, Sqlite};

use crate::{
    models::{NewSuggestion, Suggestion, SuggestionId},
    repository::conversion::DBConvertible,
};

use super::conversion::DBFromConversionError;

pub struct SuggestionRepository {
    pool: Pool<Sqlite>,
}

impl SuggestionRepository {
    pub fn new(pool: Pool<Sqlite>) -> SuggestionRepository {
        SuggestionRepository { pool }
    }

    /// Duplicate check: active suggestions are unique by exact game name.
    pub async fn find_by_name(&self, game_name: &str) -> Result<Option<Suggestion>, anyhow::Error> {
        let row = query_as::<_, SqlSuggestion>(
            r#"
                SELECT id, submitter_id, submitter_name, game_name, genres, release_date, summary, url
                FROM suggestions
                WHERE game_name = $1
                LIMIT 1
            "#,
        )
        .bind(game_name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Suggestion::from_db(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn add(&self, suggestion: &NewSuggestion) -> Result<Suggestion, anyhow::Error> {
        let submitter = suggestion.submitter.to_db();

        let added = query_as::<_, SqlSuggestion>(
            r#"
                INSERT INTO suggestions (submitter_id, submitter_name, game_name, genres, release_date, summary, url)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, submitter_id, submitter_name, game_name, genres, release_date, summary, url
            "#,
        )
        .bind(submitter)
        .bind(&suggestion.submitter_name)
        .bind(&suggestion.game_name)
        .bind(&suggestion.genres)
        .bind(&suggestion.release_date)
        .bind(&suggestion.summary)
        .bind(&suggestion.url)
        .fetch_one(&self.pool)
        .await?;

        Ok(Suggestion::from_db(&added)?)
    }

    /// The backlog in submission order, for the `listgames` command.
    pub async fn list_active(&self) -> Result<Vec<Suggestion>, anyhow::Error> {
        let rows = query_as::<_, SqlSuggestion>(
            r#"
                SELECT id, submitter_id, submitter_name, game_name, genres, release_date, summary, url
                FROM suggestions
                ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Ok(Suggestion::from_db(row)?))
            .collect()
    }

    /// The backlog newest-first, for the web view.
    pub async fn list_active_newest_first(&self) -> Result<Vec<Suggestion>, anyhow::Error> {
        let rows = query_as::<_, SqlSuggestion>(
            r#"
                SELECT id, submitter_id, submitter_name, game_name, genres, release_date, summary, url
                FROM suggestions
                ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Ok(Suggestion::from_db(row)?))
            .collect()
    }

    /// Titles of every active suggestion, for the sale scanner.
    pub async fn game_names(&self) -> Result<Vec<String>, anyhow::Error> {
        let names = sqlx::query_scalar::<_, String>("SELECT game_name FROM suggestions ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(names)
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct SqlSuggestion {
    pub(crate) id: i64,
    pub(crate) submitter_id: i64,
    pub(crate) submitter_name: String,
    pub(crate) game_name: String,
    pub(crate) genres: String,
    pub(crate) release_date: String,
    pub(crate) summary: String,
    pub(crate) url: String,
}

impl DBConvertible for Suggestion {
    type DBType = SqlSuggestion;

    fn to_db(&self) -> Self::DBType {
        SqlSuggestion {
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
        Ok(Suggestion {
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
    use crate::repository::test_utils::memory_pool;

    fn new_suggestion(submitter: u64, game_name: &str) -> NewSuggestion {
        NewSuggestion {
            submitter: UserId::new(submitter),
            submitter_name: format!("user-{submitter}"),
            game_name: game_name.to_string(),
            genres: "Adventure, Puzzle".to_string(),
            release_date: "2016-05-10".to_string(),
            summary: "A short summary.".to_string(),
            url: format!("https://www.igdb.com/games/{}", game_name.to_lowercase()),
        }
    }

    #[test_log::test(tokio::test)]
    async fn backlog_keeps_insertion_order() {
        let repo = SuggestionRepository::new(memory_pool().await);

        repo.add(&new_suggestion(1, "Outer Wilds")).await.unwrap();
        repo.add(&new_suggestion(2, "Hades")).await.unwrap();
        repo.add(&new_suggestion(1, "Celeste")).await.unwrap();

        let names: Vec<_> = repo
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.game_name)
            .collect();
        assert_eq!(names, vec!["Outer Wilds", "Hades", "Celeste"]);

        let newest_first: Vec<_> = repo
            .list_active_newest_first()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.game_name)
            .collect();
        assert_eq!(newest_first, vec!["Celeste", "Hades", "Outer Wilds"]);
    }

    #[test_log::test(tokio::test)]
    async fn find_by_name_is_exact() {
        let repo = SuggestionRepository::new(memory_pool().await);

        repo.add(&new_suggestion(1, "Outer Wilds")).await.unwrap();

        assert!(repo.find_by_name("Outer Wilds").await.unwrap().is_some());
        assert!(repo.find_by_name("outer wilds").await.unwrap().is_none());
        assert!(repo.find_by_name("Outer").await.unwrap().is_none());
    }

    #[test_log::test(tokio::test)]
    async fn duplicate_name_is_rejected_by_the_store() {
        let repo = SuggestionRepository::new(memory_pool().await);

        repo.add(&new_suggestion(1, "Hades")).await.unwrap();
        let result = repo.add(&new_suggestion(2, "Hades")).await;

        assert!(result.is_err());
        assert_eq!(repo.list_active().await.unwrap().len(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn game_names_lists_all_titles() {
        let repo = SuggestionRepository::new(memory_pool().await);

        repo.add(&new_suggestion(1, "Hades")).await.unwrap();
        repo.add(&new_suggestion(2, "Celeste")).await.unwrap();

        assert_eq!(repo.game_names().await.unwrap(), vec!["Hades", "Celeste"]);
    }
}
