use std::collections::{HashMap, HashSet};

use bigdecimal::BigDecimal;

use crate::{
    error::Error,
    helpers::math,
    provider::Lcd,
    types::{TaxCap, TreasuryParams},
};

/// Treasury tax parameters as of one chain height. Built once per ingestion
/// batch and shared read-only by every transaction in it.
#[derive(Debug, Clone)]
pub struct TaxPolicy {
    pub rate: BigDecimal,
    pub caps: HashMap<String, BigDecimal>,
    pub policy_cap: BigDecimal,
    pub exemption_list: HashSet<String>,
    pub as_of_height: i64,
}

impl TaxPolicy {
    pub async fn fetch(lcd: &Lcd, height: i64) -> Result<TaxPolicy, Error> {
        let (tax_rate, tax_caps, treasury_params, exemption_list) = tokio::try_join!(
            lcd.get_tax_rate(height),
            lcd.get_tax_caps(height),
            lcd.get_treasury_params(height),
            lcd.get_tax_exemption_list(height),
        )?;

        Self::from_parts(
            &tax_rate,
            tax_caps,
            treasury_params,
            exemption_list,
            height,
        )
    }

    pub fn from_parts(
        tax_rate: &str,
        tax_caps: Vec<TaxCap>,
        treasury_params: TreasuryParams,
        exemption_list: Vec<String>,
        height: i64,
    ) -> Result<TaxPolicy, Error> {
        let mut caps = HashMap::new();
        for cap in tax_caps {
            caps.insert(cap.denom, math::parse(&cap.tax_cap)?);
        }

        Ok(TaxPolicy {
            rate: math::parse(tax_rate)?,
            caps,
            policy_cap: math::parse(&treasury_params.tax_policy.cap.amount)?,
            exemption_list: exemption_list.into_iter().collect(),
            as_of_height: height,
        })
    }

    /// Per-denom cap when the chain defines one, the policy cap otherwise.
    pub fn cap_for(&self, denom: &str) -> &BigDecimal {
        self.caps.get(denom).unwrap_or(&self.policy_cap)
    }

    pub fn is_exempt_pair(&self, from: &str, to: &str) -> bool {
        self.exemption_list.contains(from) && self.exemption_list.contains(to)
    }
}
