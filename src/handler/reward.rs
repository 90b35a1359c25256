use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use futures::TryFutureExt;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::{
    configuration::{AppState, State},
    constants::{SWAP_EVENT, SWAP_FEE_ATTRIBUTE, TAX_LOG_KEY},
    error::Error,
    helpers::{coin::split_denom_and_amount, math, MinuteWindow},
    model::{Block, Reward},
    types::{DenomMap, LcdTransaction},
};

/// Fee totals of the successful transactions in one window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeeSums {
    pub gas: DenomMap,
    pub tax: DenomMap,
    pub swap_fee: DenomMap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregationReport {
    pub datetime: DateTime<Utc>,
    pub rows: Vec<Reward>,
    pub swap_fee: DenomMap,
}

/// A block records the reward of the block before it, so the window loses
/// its first block and gains the one right after it.
pub fn shift_blocks(mut blocks: Vec<Block>, next: Option<Block>) -> Vec<Block> {
    if blocks.is_empty() {
        return blocks;
    }

    if let Some(next) = next {
        blocks.push(next);
    }

    blocks.remove(0);
    blocks
}

/// Merged (reward, commission) of the given blocks.
pub fn sum_block_rewards(blocks: &[Block]) -> (DenomMap, DenomMap) {
    blocks.iter().fold(
        (DenomMap::new(), DenomMap::new()),
        |(reward, commission), block| {
            (reward.merged(&block.reward), commission.merged(&block.commission))
        },
    )
}

pub fn extract_gas_fee(tx: &LcdTransaction) -> Result<DenomMap, Error> {
    let mut gas = DenomMap::new();

    for coin in &tx.tx.value.fee.amount {
        gas.add(&coin.denom, &math::parse(&coin.amount)?);
    }

    Ok(gas)
}

/// Reads back the per-message tax annotations left on the logs.
pub fn extract_tax(tx: &LcdTransaction) -> Result<DenomMap, Error> {
    let mut tax = DenomMap::new();

    let annotations = tx
        .logs()
        .iter()
        .filter_map(|log| log.log.get(TAX_LOG_KEY).and_then(Value::as_str))
        .filter(|value| !value.is_empty());

    for annotation in annotations {
        for coin in annotation.split(',') {
            let (amount, denom) = split_denom_and_amount(coin)?;
            tax.add(&denom, &amount);
        }
    }

    Ok(tax)
}

pub fn extract_swap_fee(tx: &LcdTransaction) -> Result<DenomMap, Error> {
    let mut swap_fee = DenomMap::new();

    let attributes = tx
        .logs()
        .iter()
        .flat_map(|log| &log.events)
        .filter(|event| event.r#type == SWAP_EVENT)
        .filter_map(|event| {
            event
                .attributes
                .iter()
                .find(|attribute| attribute.key == SWAP_FEE_ATTRIBUTE)
        });

    for attribute in attributes {
        let (amount, denom) = split_denom_and_amount(&attribute.value)?;
        swap_fee.add(&denom, &amount);
        debug!(
            "swap fee: {} {} {}",
            tx.txhash,
            denom,
            math::format(&swap_fee.get_or_zero(&denom))
        );
    }

    Ok(swap_fee)
}

fn extract_fees(tx: &LcdTransaction) -> Result<FeeSums, Error> {
    Ok(FeeSums {
        gas: extract_gas_fee(tx)?,
        tax: extract_tax(tx)?,
        swap_fee: extract_swap_fee(tx)?,
    })
}

/// Sums gas, tax and swap fees over the successful transactions. A
/// transaction with an unreadable coin is logged and left out.
pub fn sum_fees(txs: &[LcdTransaction]) -> FeeSums {
    let mut sums = FeeSums::default();

    for tx in txs.iter().filter(|tx| !tx.is_failed()) {
        match extract_fees(tx) {
            Ok(fees) => {
                sums.gas.merge(&fees.gas);
                sums.tax.merge(&fees.tax);
                sums.swap_fee.merge(&fees.swap_fee);
            },
            Err(err) => {
                error!("collect_reward: skipping fees of tx {}: {}", tx.txhash, err);
            },
        }
    }

    sums
}

/// Prices of one window, per unit of the bonding denomination.
#[derive(Debug, Clone, Copy)]
pub struct UsdPricing<'a> {
    pub prices: &'a DenomMap,
    pub bond_denom: &'a str,
    pub stable_denom: &'a str,
}

impl UsdPricing<'_> {
    /// USD value of `amount` of `denom`. Every valuation needs the stable
    /// price; missing prices value the amount at zero.
    pub fn value(&self, denom: &str, amount: &BigDecimal) -> BigDecimal {
        let Some(stable_price) = self.prices.get(self.stable_denom) else {
            return BigDecimal::zero();
        };

        if denom == self.stable_denom {
            return amount.clone();
        }

        if denom == self.bond_denom {
            return math::times(stable_price, amount);
        }

        let Some(price) = self.prices.get(denom) else {
            return BigDecimal::zero();
        };

        math::div(price, stable_price)
            .and_then(|rate| math::div(amount, &rate))
            .unwrap_or_else(|_| BigDecimal::zero())
    }
}

/// One ledger row per issued denomination that earned a reward.
pub fn build_rewards(
    datetime: DateTime<Utc>,
    issuance: &DenomMap,
    reward_sum: &DenomMap,
    commission: &DenomMap,
    fees: &FeeSums,
    pricing: &UsdPricing,
) -> Vec<Reward> {
    issuance
        .keys()
        .filter_map(|denom| {
            let sum = reward_sum.get(denom).filter(|sum| !sum.is_zero())?;
            let tax = fees.tax.get_or_zero(denom);
            let gas = fees.gas.get_or_zero(denom);
            let oracle =
                math::floor_at_zero(math::minus(&math::minus(sum, &tax), &gas));

            Some(Reward {
                denom: denom.to_owned(),
                datetime,
                tax_usd: pricing.value(denom, &tax),
                gas_usd: pricing.value(denom, &gas),
                oracle_usd: pricing.value(denom, &oracle),
                tax,
                gas,
                sum: sum.clone(),
                commission: commission.get_or_zero(denom),
                oracle,
            })
        })
        .collect()
}

async fn query_fees(
    app_state: &AppState<State>,
    window: MinuteWindow,
) -> Result<FeeSums, Error> {
    let data = app_state
        .database
        .tx
        .get_data_in_window(&app_state.config.chain_id, window.from, window.to)
        .await?;

    let txs: Vec<LcdTransaction> = data
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(tx) => Some(tx),
            Err(err) => {
                error!("collect_reward: unreadable tx payload: {}", err);
                None
            },
        })
        .collect();

    Ok(sum_fees(&txs))
}

/// Writes the reward ledger of the minute containing `timestamp`. Re-running
/// a window overwrites its rows with the same values.
pub async fn aggregate_reward_window(
    app_state: &AppState<State>,
    timestamp: DateTime<Utc>,
) -> Result<AggregationReport, Error> {
    let window = MinuteWindow::containing(timestamp)?;
    let database = &app_state.database;
    let config = &app_state.config;

    let blocks = database
        .block
        .get_in_window(&config.chain_id, window.from, window.to)
        .await?;

    let Some(height) = blocks.last().map(|block| block.height) else {
        info!("collect_reward: no blocks in {}", window.from);
        return Ok(AggregationReport {
            datetime: window.from,
            rows: vec![],
            swap_fee: DenomMap::new(),
        });
    };

    let next = database.block.get_by_height(&config.chain_id, height + 1).await?;
    let (reward_sum, commission) = sum_block_rewards(&shift_blocks(blocks, next));

    let (issuance, fees, prices) = tokio::try_join!(
        app_state.lcd.get_all_active_issuance(height),
        query_fees(app_state, window),
        database.price.get_active_prices(window.from).map_err(Error::from),
    )?;

    let pricing = UsdPricing {
        prices: &prices,
        bond_denom: &config.bond_denom,
        stable_denom: &config.stable_denom,
    };

    let rows = build_rewards(
        window.from,
        &issuance,
        &reward_sum,
        &commission,
        &fees,
        &pricing,
    );

    let mut transaction = database.pool.begin().await?;
    for row in &rows {
        database.reward.upsert(row, &mut transaction).await?;
    }
    transaction.commit().await?;

    info!("collect_reward: {}, rows: {}", window.from, rows.len());

    Ok(AggregationReport {
        datetime: window.from,
        rows,
        swap_fee: fees.swap_fee,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;
    use serde_json::json;
    use sqlx::types::Json;

    use super::*;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn map(entries: &[(&str, &str)]) -> DenomMap {
        entries
            .iter()
            .map(|(denom, amount)| (denom.to_string(), dec(amount)))
            .collect()
    }

    fn block(height: i64, reward: DenomMap, commission: DenomMap) -> Block {
        Block {
            id: height,
            chain_id: String::from("columbus-5"),
            height,
            timestamp: Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap(),
            reward: Json(reward),
            commission: Json(commission),
        }
    }

    fn lcd_tx(value: Value) -> LcdTransaction {
        serde_json::from_value(value).unwrap()
    }

    fn swap_tx() -> LcdTransaction {
        lcd_tx(json!({
            "height": "100",
            "txhash": "AA",
            "timestamp": "2022-01-01T00:00:10Z",
            "tx": {
                "type": "core/StdTx",
                "value": {
                    "fee": {"amount": [{"denom": "uluna", "amount": "5"}], "gas": "100"},
                    "msg": [{}, {}]
                }
            },
            "logs": [
                {"msg_index": 0, "log": {"tax": "20uluna,3uusd"}, "events": []},
                {
                    "msg_index": 1,
                    "log": "",
                    "events": [{
                        "type": "swap",
                        "attributes": [
                            {"key": "offer", "value": "100uluna"},
                            {"key": "swap_fee", "value": "1.5ukrw"}
                        ]
                    }]
                }
            ]
        }))
    }

    #[test]
    fn test_shift_blocks_drops_first_and_appends_next() {
        let blocks = vec![
            block(1, DenomMap::new(), DenomMap::new()),
            block(2, DenomMap::new(), DenomMap::new()),
        ];
        let next = Some(block(3, DenomMap::new(), DenomMap::new()));

        let heights: Vec<i64> =
            shift_blocks(blocks, next).iter().map(|b| b.height).collect();
        assert_eq!(heights, vec![2, 3]);

        let blocks = vec![block(1, DenomMap::new(), DenomMap::new())];
        assert!(shift_blocks(blocks, None).is_empty());
        assert!(shift_blocks(vec![], None).is_empty());
    }

    #[test]
    fn test_sum_block_rewards() {
        let blocks = vec![
            block(2, map(&[("uluna", "60")]), map(&[("uluna", "4")])),
            block(3, map(&[("uluna", "40"), ("uusd", "7")]), map(&[("uluna", "6")])),
        ];

        let (reward, commission) = sum_block_rewards(&blocks);

        assert_eq!(reward, map(&[("uluna", "100"), ("uusd", "7")]));
        assert_eq!(commission, map(&[("uluna", "10")]));
    }

    #[test]
    fn test_extract_fees() {
        let tx = swap_tx();

        assert_eq!(extract_gas_fee(&tx).unwrap(), map(&[("uluna", "5")]));
        assert_eq!(
            extract_tax(&tx).unwrap(),
            map(&[("uluna", "20"), ("uusd", "3")])
        );
        assert_eq!(extract_swap_fee(&tx).unwrap(), map(&[("ukrw", "1.5")]));
    }

    #[test]
    fn test_sum_fees_skips_failed() {
        let mut failed = swap_tx();
        failed.code = Some(5);

        let sums = sum_fees(&[swap_tx(), failed, swap_tx()]);

        assert_eq!(sums.gas, map(&[("uluna", "10")]));
        assert_eq!(sums.tax, map(&[("uluna", "40"), ("uusd", "6")]));
        assert_eq!(sums.swap_fee, map(&[("ukrw", "3")]));
    }

    #[test]
    fn test_sum_fees_skips_tx_with_unreadable_coin() {
        let mut broken = swap_tx();
        broken.txhash = String::from("BB");
        if let Some(logs) = broken.logs.as_mut() {
            logs[1].events[0].attributes[1].value = String::new();
        }

        assert!(extract_swap_fee(&broken).is_err());

        let sums = sum_fees(&[swap_tx(), broken]);

        assert_eq!(sums.gas, map(&[("uluna", "5")]));
        assert_eq!(sums.tax, map(&[("uluna", "20"), ("uusd", "3")]));
        assert_eq!(sums.swap_fee, map(&[("ukrw", "1.5")]));
    }

    #[test]
    fn test_usd_value() {
        let prices = map(&[("uusd", "80"), ("ukrw", "80000")]);
        let pricing = UsdPricing {
            prices: &prices,
            bond_denom: "uluna",
            stable_denom: "uusd",
        };

        assert_eq!(pricing.value("uusd", &dec("50")), dec("50"));
        assert_eq!(pricing.value("uluna", &dec("10")), dec("800"));
        assert_eq!(pricing.value("ukrw", &dec("100000")), dec("100"));
        assert_eq!(pricing.value("usdr", &dec("10")), dec("0"));

        let empty = DenomMap::new();
        let unpriced = UsdPricing {
            prices: &empty,
            ..pricing
        };
        assert_eq!(unpriced.value("uluna", &dec("10")), dec("0"));
    }

    #[test]
    fn test_build_rewards_oracle_residual() {
        let datetime = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let fees = FeeSums {
            gas: map(&[("uluna", "5")]),
            tax: map(&[("uluna", "20")]),
            swap_fee: DenomMap::new(),
        };

        let rows = build_rewards(
            datetime,
            &map(&[("uluna", "1000000"), ("ukrw", "1")]),
            &map(&[("uluna", "100")]),
            &map(&[("uluna", "10")]),
            &fees,
            &UsdPricing {
                prices: &map(&[("uusd", "2")]),
                bond_denom: "uluna",
                stable_denom: "uusd",
            },
        );

        assert_eq!(
            rows,
            vec![Reward {
                denom: String::from("uluna"),
                datetime,
                tax: dec("20"),
                tax_usd: dec("40"),
                gas: dec("5"),
                gas_usd: dec("10"),
                sum: dec("100"),
                commission: dec("10"),
                oracle: dec("75"),
                oracle_usd: dec("150"),
            }]
        );
    }

    #[test]
    fn test_build_rewards_oracle_floored_at_zero() {
        let datetime = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let fees = FeeSums {
            gas: map(&[("uusd", "60")]),
            tax: map(&[("uusd", "60")]),
            swap_fee: DenomMap::new(),
        };

        let rows = build_rewards(
            datetime,
            &map(&[("uusd", "1")]),
            &map(&[("uusd", "100")]),
            &DenomMap::new(),
            &fees,
            &UsdPricing {
                prices: &DenomMap::new(),
                bond_denom: "uluna",
                stable_denom: "uusd",
            },
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].oracle, dec("0"));
        assert_eq!(rows[0].oracle_usd, dec("0"));
        assert_eq!(rows[0].commission, dec("0"));
    }
}
