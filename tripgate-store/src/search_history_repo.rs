use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use tripgate_core::SearchHistoryRepository;
use tripgate_shared::models::events::SearchLoggedEvent;

/// Analytics log of hotel searches. Writes are best-effort; callers ignore
/// failures.
pub struct PgSearchHistoryRepository {
    pool: PgPool,
}

impl PgSearchHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchHistoryRepository for PgSearchHistoryRepository {
    async fn log_search(
        &self,
        event: &SearchLoggedEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO search_history (id, search_type, search_params, results_count)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&event.search_type)
        .bind(&event.search_params)
        .bind(event.results_count)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
