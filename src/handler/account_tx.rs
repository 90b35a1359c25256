use std::collections::BTreeSet;

use serde_json::Value;

use crate::model::{Account_Tx, Tx};

/// Index rows for every account a persisted transaction touches, either in
/// its messages or in the events it emitted.
pub fn generate_account_txs(
    tx: &Tx,
    tx_id: i64,
    prefix: &str,
) -> Vec<Account_Tx> {
    let mut stack: Vec<&Value> = Vec::new();

    if let Some(msgs) = tx.data.pointer("/tx/value/msg") {
        stack.push(msgs);
    }

    if let Some(logs) = tx.data.get("logs").and_then(Value::as_array) {
        stack.extend(logs.iter().filter_map(|log| log.get("events")));
    }

    let mut accounts = BTreeSet::new();

    while let Some(value) = stack.pop() {
        match value {
            Value::String(text) => {
                accounts.extend(
                    text.split(|c: char| !c.is_ascii_alphanumeric())
                        .filter(|token| is_account_address(token, prefix))
                        .map(str::to_owned),
                );
            },
            Value::Array(items) => stack.extend(items),
            Value::Object(map) => stack.extend(map.values()),
            _ => {},
        }
    }

    accounts
        .into_iter()
        .map(|account| Account_Tx {
            account,
            chain_id: tx.chain_id.to_owned(),
            hash: tx.hash.to_owned(),
            tx_id,
            timestamp: tx.timestamp,
        })
        .collect()
}

/// `<prefix>1` followed by 38 (account) or 58 (contract) bech32 characters.
pub fn is_account_address(token: &str, prefix: &str) -> bool {
    let Some(body) = token
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('1'))
    else {
        return false;
    };

    matches!(body.len(), 38 | 58)
        && body
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}
