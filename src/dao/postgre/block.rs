use chrono::{DateTime, Utc};
use sqlx::Error;

use crate::model::{Block, Table};

impl Table<Block> {
    /// Blocks with `from <= timestamp < to`, ordered by height.
    pub async fn get_in_window(
        &self,
        chain_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Block>, Error> {
        sqlx::query_as(
            r#"
            SELECT "id", "chain_id", "height", "timestamp", "reward", "commission"
            FROM "block"
            WHERE
                "chain_id" = $1 AND
                "timestamp" >= $2 AND
                "timestamp" < $3
            ORDER BY "height" ASC
            "#,
        )
        .bind(chain_id)
        .bind(from)
        .bind(to)
        .persistent(true)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_by_height(
        &self,
        chain_id: &str,
        height: i64,
    ) -> Result<Option<Block>, Error> {
        sqlx::query_as(
            r#"
            SELECT "id", "chain_id", "height", "timestamp", "reward", "commission"
            FROM "block"
            WHERE "chain_id" = $1 AND "height" = $2
            "#,
        )
        .bind(chain_id)
        .bind(height)
        .persistent(true)
        .fetch_optional(&self.pool)
        .await
    }
}
