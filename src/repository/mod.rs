mod conversion;
mod pick_repository;
mod suggestion_repository;

pub use pick_repository::PickRepository;
pub use suggestion_repository::SuggestionRepository;

#[cfg(test)]
pub(crate) mod test_utils {
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

    /// In-memory database with migrations applied. Single connection so every
    /// query sees the same memory store.
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("In-memory SQLite should always connect");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Migrations should apply cleanly");

        pool
    }
}
