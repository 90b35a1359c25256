use bigdecimal::{BigDecimal, Zero};
use serde_json::{Map, Value};

use crate::{
    constants::{BURN_TAX_UPGRADE_HEIGHT, LEGACY_CHAIN_ID, TAX_LOG_KEY},
    error::Error,
    helpers::{coin::join_denom_and_amount, math},
    types::{Coin, LcdTransaction, Message},
};

use super::tax_policy::TaxPolicy;

/// Coins a message moves that are subject to tax, before grouping.
pub fn get_tax_coins(message: &Message, policy: &TaxPolicy) -> Vec<Coin> {
    match message {
        Message::Send(msg) => {
            if policy.is_exempt_pair(&msg.from_address, &msg.to_address) {
                return vec![];
            }
            msg.amount.clone()
        },
        Message::MultiSend(msg) => msg
            .inputs
            .iter()
            .enumerate()
            .filter(|(index, input)| {
                !msg.outputs.get(*index).is_some_and(|output| {
                    policy.is_exempt_pair(&input.address, &output.address)
                })
            })
            .flat_map(|(_, input)| input.coins.iter().cloned())
            .collect(),
        Message::SwapSend(msg) => vec![msg.offer_coin.clone()],
        Message::InstantiateContract(msg) => msg
            .init_coins
            .as_ref()
            .or(msg.funds.as_ref())
            .cloned()
            .unwrap_or_default(),
        Message::InstantiateContract2(msg) => msg.funds.clone(),
        Message::ExecuteContract(msg) => msg
            .coins
            .as_ref()
            .or(msg.funds.as_ref())
            .cloned()
            .unwrap_or_default(),
        Message::Exec(msgs) => msgs
            .iter()
            .flat_map(|msg| get_tax_coins(msg, policy))
            .collect(),
        Message::Other(_) => vec![],
    }
}

/// Sums coins per denomination, keeping first-seen order.
fn group_by_denom(coins: &[Coin]) -> Result<Vec<(String, BigDecimal)>, Error> {
    let mut grouped: Vec<(String, BigDecimal)> = Vec::new();

    for coin in coins {
        let amount = math::parse(&coin.amount)?;
        match grouped.iter_mut().find(|(denom, _)| denom == &coin.denom) {
            Some((_, sum)) => *sum = math::plus(sum, &amount),
            None => grouped.push((coin.denom.to_owned(), amount)),
        }
    }

    Ok(grouped)
}

pub fn get_tax(
    message: &Message,
    height: i64,
    chain_id: &str,
    bond_denom: &str,
    policy: &TaxPolicy,
) -> Result<Vec<(String, BigDecimal)>, Error> {
    let coins = group_by_denom(&get_tax_coins(message, policy))?;
    let mut taxes = Vec::with_capacity(coins.len());

    for (denom, amount) in coins {
        if denom == bond_denom
            && chain_id == LEGACY_CHAIN_ID
            && height < BURN_TAX_UPGRADE_HEIGHT
        {
            continue;
        }

        let cap = policy.cap_for(&denom);
        let tax = math::min(
            &math::integer_portion(&math::times(&amount, &policy.rate)),
            cap,
        );
        taxes.push((denom, tax));
    }

    Ok(taxes)
}

/// Splits the paid fee into tax and gas. The fee field is rewritten to the
/// gas portion and every log entry is annotated with the tax its message paid.
/// Failed transactions and transactions without logs are returned unchanged.
pub fn resolve(
    mut tx: LcdTransaction,
    policy: &TaxPolicy,
    chain_id: &str,
    bond_denom: &str,
) -> Result<LcdTransaction, Error> {
    if tx.is_failed() || tx.logs().is_empty() {
        return Ok(tx);
    }

    let height: i64 = tx.height.parse()?;

    let mut fees: Vec<(String, BigDecimal)> = Vec::new();
    for coin in &tx.tx.value.fee.amount {
        let amount = math::parse(&coin.amount)?;
        match fees.iter_mut().find(|(denom, _)| denom == &coin.denom) {
            Some((_, value)) => *value = amount,
            None => fees.push((coin.denom.to_owned(), amount)),
        }
    }

    let mut tax_per_msg: Vec<Vec<String>> =
        Vec::with_capacity(tx.tx.value.msg.len());

    for value in &tx.tx.value.msg {
        let message = Message::from_value(value, &tx.height, &tx.txhash)?;
        let taxes = get_tax(&message, height, chain_id, bond_denom, policy)?;
        let mut annotations = Vec::with_capacity(taxes.len());

        for (denom, amount) in taxes {
            if let Some(index) = fees.iter().position(|(d, _)| d == &denom) {
                let rest = math::minus(&fees[index].1, &amount);
                if rest.is_zero() {
                    fees.remove(index);
                } else {
                    fees[index].1 = rest;
                }
            }

            annotations.push(join_denom_and_amount(&amount, &denom));
        }

        tax_per_msg.push(annotations);
    }

    let logs = tx.logs().len();
    if logs != tax_per_msg.len() {
        return Err(Error::AnnotationLengthMismatch {
            logs,
            messages: tax_per_msg.len(),
        });
    }

    tx.tx.value.fee.amount = fees
        .into_iter()
        .map(|(denom, amount)| Coin {
            denom,
            amount: math::format(&amount),
        })
        .collect();

    if let Some(logs) = tx.logs.as_mut() {
        for (log, annotations) in logs.iter_mut().zip(tax_per_msg) {
            if annotations.is_empty() {
                continue;
            }

            let mut annotation = Map::new();
            annotation
                .insert(TAX_LOG_KEY.to_owned(), Value::String(annotations.join(",")));
            log.log = Value::Object(annotation);
        }
    }

    Ok(tx)
}
