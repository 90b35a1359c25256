use sqlx::Error;

use crate::model::{Reward, Table};

use super::{DBTransaction, QueryResult};

impl Table<Reward> {
    /// Writes the row for (denom, datetime), replacing every value of an
    /// existing one. Re-running a window yields the same row.
    pub async fn upsert(
        &self,
        data: &Reward,
        transaction: &mut DBTransaction<'_>,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "reward" (
                "denom",
                "datetime",
                "tax",
                "tax_usd",
                "gas",
                "gas_usd",
                "sum",
                "commission",
                "oracle",
                "oracle_usd"
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT ("denom", "datetime") DO UPDATE SET
                "tax" = EXCLUDED."tax",
                "tax_usd" = EXCLUDED."tax_usd",
                "gas" = EXCLUDED."gas",
                "gas_usd" = EXCLUDED."gas_usd",
                "sum" = EXCLUDED."sum",
                "commission" = EXCLUDED."commission",
                "oracle" = EXCLUDED."oracle",
                "oracle_usd" = EXCLUDED."oracle_usd"
            "#,
        )
        .bind(&data.denom)
        .bind(data.datetime)
        .bind(&data.tax)
        .bind(&data.tax_usd)
        .bind(&data.gas)
        .bind(&data.gas_usd)
        .bind(&data.sum)
        .bind(&data.commission)
        .bind(&data.oracle)
        .bind(&data.oracle_usd)
        .persistent(true)
        .execute(&mut **transaction)
        .await
    }
}
