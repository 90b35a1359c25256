use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    configuration::Config,
    constants::HEIGHT_HEADER,
    error::Error,
    helpers::math,
    types::{
        ActiveDenomsResponse, Coin, DenomMap, LcdTransaction, Pagination,
        SupplyResponse, TaxCap, TaxCapsResponse, TaxExemptionListResponse,
        TaxRateResponse, TreasuryParams, TreasuryParamsResponse,
    },
};

/// REST client for the chain LCD. Height-bound queries send the height in
/// the `x-cosmos-block-height` header.
#[derive(Debug)]
pub struct Lcd {
    config: Config,
    host: Url,
    pub http: Client,
}

impl Lcd {
    pub fn new(config: Config) -> Result<Lcd, Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        let mut host = config.lcd_host.to_owned();
        if !host.ends_with('/') {
            host.push('/');
        }
        let host = Url::parse(&host)?;

        Ok(Lcd { config, host, http })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        height: Option<i64>,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.host.join(path)?;
        let mut request = self.http.get(url).query(query);

        if let Some(height) = height {
            request = request.header(HEIGHT_HEADER, height.to_string());
        }

        let data = request.send().await?.error_for_status()?.json::<T>().await?;
        Ok(data)
    }

    pub async fn get_tx(&self, hash: &str) -> Result<LcdTransaction, Error> {
        let tx = self
            .get::<LcdTransaction>(&format!("txs/{}", hash), None, &[])
            .await
            .with_context(|| format!("Failed to query tx {}", hash))?;

        Ok(tx)
    }

    pub async fn get_tax_rate(&self, height: i64) -> Result<String, Error> {
        let data: TaxRateResponse = self
            .get("terra/treasury/v1beta1/tax_rate", Some(height), &[])
            .await?;
        Ok(data.tax_rate)
    }

    pub async fn get_tax_caps(&self, height: i64) -> Result<Vec<TaxCap>, Error> {
        let data: TaxCapsResponse = self
            .get("terra/treasury/v1beta1/tax_caps", Some(height), &[])
            .await?;
        Ok(data.tax_caps)
    }

    pub async fn get_treasury_params(
        &self,
        height: i64,
    ) -> Result<TreasuryParams, Error> {
        let data: TreasuryParamsResponse = self
            .get("terra/treasury/v1beta1/params", Some(height), &[])
            .await?;
        Ok(data.params)
    }

    pub async fn get_tax_exemption_list(
        &self,
        height: i64,
    ) -> Result<Vec<String>, Error> {
        let mut addresses = Vec::new();
        let mut key: Option<String> = None;

        loop {
            let data: TaxExemptionListResponse = self
                .get(
                    "terra/treasury/v1beta1/burn_tax_exemption_list",
                    Some(height),
                    &page_query(&key),
                )
                .await?;

            addresses.extend(data.addresses);
            key = next_key(data.pagination);

            if key.is_none() {
                break;
            }
        }

        Ok(addresses)
    }

    pub async fn get_total_supply(
        &self,
        height: Option<i64>,
    ) -> Result<Vec<Coin>, Error> {
        let mut supply = Vec::new();
        let mut key: Option<String> = None;

        loop {
            let data: SupplyResponse = self
                .get("cosmos/bank/v1beta1/supply", height, &page_query(&key))
                .await?;

            supply.extend(data.supply);
            key = next_key(data.pagination);

            if key.is_none() {
                break;
            }
        }

        Ok(supply)
    }

    pub async fn get_active_denoms(
        &self,
        height: i64,
    ) -> Result<Vec<String>, Error> {
        let data: ActiveDenomsResponse = self
            .get("terra/oracle/v1beta1/denoms/actives", Some(height), &[])
            .await?;
        Ok(data.actives)
    }

    /// Total supply of the bonding denom and every oracle-active denom.
    pub async fn get_all_active_issuance(
        &self,
        height: i64,
    ) -> Result<DenomMap, Error> {
        let (supply, actives) = tokio::try_join!(
            self.get_total_supply(Some(height)),
            self.get_active_denoms(height),
        )?;

        let mut issuance = DenomMap::new();
        for coin in supply {
            if coin.denom == self.config.bond_denom
                || actives.contains(&coin.denom)
            {
                issuance.add(&coin.denom, &math::parse(&coin.amount)?);
            }
        }

        Ok(issuance)
    }
}

fn page_query(key: &Option<String>) -> Vec<(&'static str, String)> {
    match key {
        Some(key) => vec![("pagination.key", key.to_owned())],
        None => vec![],
    }
}

fn next_key(pagination: Option<Pagination>) -> Option<String> {
    pagination
        .and_then(|page| page.next_key)
        .filter(|key| !key.is_empty())
}
