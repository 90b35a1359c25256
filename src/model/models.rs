//! Database entity structs.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{
    types::{BigDecimal, Json},
    FromRow,
};

use crate::types::DenomMap;

// =============================================================================
// CHAIN
// =============================================================================

/// Block row written by upstream ingestion. `reward` and `commission` hold
/// the staking distribution recorded at this height.
#[derive(Debug, Clone, FromRow)]
pub struct Block {
    pub id: i64,
    pub chain_id: String,
    pub height: i64,
    pub timestamp: DateTime<Utc>,
    pub reward: Json<DenomMap>,
    pub commission: Json<DenomMap>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Tx {
    pub chain_id: String,
    pub hash: String,
    pub data: Json<Value>,
    pub timestamp: DateTime<Utc>,
    pub block_id: i64,
}

impl Tx {
    /// A stored transaction without a non-zero result code succeeded.
    pub fn is_successful(&self) -> bool {
        self.data
            .get("code")
            .and_then(Value::as_u64)
            .unwrap_or(0)
            == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Account_Tx {
    pub account: String,
    pub chain_id: String,
    pub hash: String,
    pub tx_id: i64,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// LEDGER
// =============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct Price {
    pub denom: String,
    pub datetime: DateTime<Utc>,
    pub price: BigDecimal,
}

/// One row per (denom, minute).
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Reward {
    pub denom: String,
    pub datetime: DateTime<Utc>,
    pub tax: BigDecimal,
    pub tax_usd: BigDecimal,
    pub gas: BigDecimal,
    pub gas_usd: BigDecimal,
    pub sum: BigDecimal,
    pub commission: BigDecimal,
    pub oracle: BigDecimal,
    pub oracle_usd: BigDecimal,
}
