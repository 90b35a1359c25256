use serde::Deserialize;

use super::Coin;

#[derive(Debug, Deserialize)]
pub struct TaxRateResponse {
    pub tax_rate: String,
}

#[derive(Debug, Deserialize)]
pub struct TaxCap {
    pub denom: String,
    pub tax_cap: String,
}

#[derive(Debug, Deserialize)]
pub struct TaxCapsResponse {
    #[serde(default)]
    pub tax_caps: Vec<TaxCap>,
}

#[derive(Debug, Deserialize)]
pub struct TaxPolicyParams {
    pub cap: Coin,
}

#[derive(Debug, Deserialize)]
pub struct TreasuryParams {
    pub tax_policy: TaxPolicyParams,
}

#[derive(Debug, Deserialize)]
pub struct TreasuryParamsResponse {
    pub params: TreasuryParams,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub next_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TaxExemptionListResponse {
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub struct SupplyResponse {
    #[serde(default)]
    pub supply: Vec<Coin>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub struct ActiveDenomsResponse {
    #[serde(default)]
    pub actives: Vec<String>,
}
