use sqlx::{Error, QueryBuilder};

use crate::model::{Account_Tx, Table};

use super::{DBTransaction, DataBase, QueryResult};

impl Table<Account_Tx> {
    /// Clears the index of the given transactions so it can be derived again
    /// from their current payloads.
    pub async fn delete_by_tx_ids(
        &self,
        tx_ids: &[i64],
        transaction: &mut DBTransaction<'_>,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            DELETE FROM "account_tx"
            WHERE "tx_id" = ANY($1)
            "#,
        )
        .bind(tx_ids)
        .persistent(true)
        .execute(&mut **transaction)
        .await
    }

    pub async fn insert_many(
        &self,
        data: &[Account_Tx],
        transaction: &mut DBTransaction<'_>,
    ) -> Result<QueryResult, Error> {
        let mut query_builder: QueryBuilder<DataBase> = QueryBuilder::new(
            r#"
            INSERT INTO "account_tx" (
                "account",
                "chain_id",
                "hash",
                "tx_id",
                "timestamp"
            )"#,
        );

        query_builder.push_values(data, |mut b, row| {
            b.push_bind(&row.account)
                .push_bind(&row.chain_id)
                .push_bind(&row.hash)
                .push_bind(row.tx_id)
                .push_bind(row.timestamp);
        });

        query_builder.push(r#" ON CONFLICT ("account", "tx_id") DO NOTHING"#);

        query_builder
            .build()
            .persistent(false)
            .execute(&mut **transaction)
            .await
    }
}
