use chrono::{DateTime, Utc};
use sqlx::Error;

use crate::{
    model::{Price, Table},
    types::DenomMap,
};

impl Table<Price> {
    pub async fn get_by_datetime(
        &self,
        datetime: DateTime<Utc>,
    ) -> Result<Vec<Price>, Error> {
        sqlx::query_as(
            r#"
            SELECT "denom", "datetime", "price"
            FROM "price"
            WHERE "datetime" = $1
            "#,
        )
        .bind(datetime)
        .persistent(true)
        .fetch_all(&self.pool)
        .await
    }

    /// Active prices keyed by denomination.
    pub async fn get_active_prices(
        &self,
        datetime: DateTime<Utc>,
    ) -> Result<DenomMap, Error> {
        let prices = self.get_by_datetime(datetime).await?;

        Ok(prices
            .into_iter()
            .map(|item| (item.denom, item.price))
            .collect())
    }
}
