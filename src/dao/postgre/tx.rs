use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{types::Json, Error, QueryBuilder};

use crate::model::{Table, Tx};

use super::{DBTransaction, DataBase};

impl Table<Tx> {
    pub async fn get_by_hashes(
        &self,
        chain_id: &str,
        hashes: &[String],
    ) -> Result<Vec<Tx>, Error> {
        if hashes.is_empty() {
            return Ok(vec![]);
        }

        sqlx::query_as(
            r#"
            SELECT "chain_id", "hash", "data", "timestamp", "block_id"
            FROM "tx"
            WHERE "chain_id" = $1 AND "hash" = ANY($2)
            "#,
        )
        .bind(chain_id)
        .bind(hashes)
        .persistent(true)
        .fetch_all(&self.pool)
        .await
    }

    /// Inserts the batch, overwriting `timestamp`, `data` and `block_id` on a
    /// (chain_id, hash) conflict. Returns the row id of every written hash.
    pub async fn upsert_many(
        &self,
        data: &[Tx],
        transaction: &mut DBTransaction<'_>,
    ) -> Result<Vec<(i64, String)>, Error> {
        if data.is_empty() {
            return Ok(vec![]);
        }

        let mut query_builder: QueryBuilder<DataBase> = QueryBuilder::new(
            r#"
            INSERT INTO "tx" (
                "chain_id",
                "hash",
                "data",
                "timestamp",
                "block_id"
            )"#,
        );

        query_builder.push_values(data, |mut b, tx| {
            b.push_bind(&tx.chain_id)
                .push_bind(&tx.hash)
                .push_bind(&tx.data)
                .push_bind(tx.timestamp)
                .push_bind(tx.block_id);
        });

        query_builder.push(
            r#"
            ON CONFLICT ("chain_id", "hash") DO UPDATE SET
                "timestamp" = EXCLUDED."timestamp",
                "data" = EXCLUDED."data",
                "block_id" = EXCLUDED."block_id"
            RETURNING "id", "hash"
            "#,
        );

        query_builder
            .build_query_as::<(i64, String)>()
            .persistent(false)
            .fetch_all(&mut **transaction)
            .await
    }

    /// Payloads of every transaction in `[from, to)`.
    pub async fn get_data_in_window(
        &self,
        chain_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Value>, Error> {
        let rows: Vec<(Json<Value>,)> = sqlx::query_as(
            r#"
            SELECT "data"
            FROM "tx"
            WHERE
                "chain_id" = $1 AND
                "timestamp" >= $2 AND
                "timestamp" < $3
            "#,
        )
        .bind(chain_id)
        .bind(from)
        .bind(to)
        .persistent(true)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(Json(data),)| data).collect())
    }
}
