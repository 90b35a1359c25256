use std::{
    collections::{HashMap, HashSet},
    num::NonZeroUsize,
    ops::Range,
    sync::Arc,
};

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use tracing::{error, info};

use crate::{
    configuration::{AppState, State},
    error::Error,
    futures_set::join_bounded,
    helpers::sanitize::sanitize,
    model::{Account_Tx, Block, Tx},
};

use super::{account_tx::generate_account_txs, tax, tax_policy::TaxPolicy};

/// Outcome of one ingested block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Unique hashes requested.
    pub attempted: usize,
    /// Hashes fetched and resolved.
    pub fetched: usize,
    /// Fetched hashes dropped because a successful version is already stored.
    pub protected: usize,
    pub persisted: usize,
    pub account_txs: usize,
}

/// Lowercased hashes in first-seen order, each once.
pub fn unique_hashes(hashes: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();

    hashes
        .iter()
        .map(|hash| hash.trim().to_lowercase())
        .filter(|hash| !hash.is_empty() && seen.insert(hash.to_owned()))
        .collect()
}

pub async fn ingest_block(
    app_state: &AppState<State>,
    block: &Block,
    hashes: &[String],
) -> Result<IngestReport, Error> {
    let hashes = unique_hashes(hashes);
    let mut report = IngestReport {
        attempted: hashes.len(),
        ..IngestReport::default()
    };

    let result = collect_txs(app_state, block, hashes, &mut report).await;

    if let Err(err) = &result {
        error!(
            "ingest_block {}: attempted {}, persisted {}: {}",
            block.height, report.attempted, report.persisted, err
        );
    }

    result.map(|_| report)
}

async fn collect_txs(
    app_state: &AppState<State>,
    block: &Block,
    hashes: Vec<String>,
    report: &mut IngestReport,
) -> Result<(), Error> {
    let pending = generate_tx_entities(app_state, block, hashes).await?;
    report.fetched = pending.len();

    let database = &app_state.database;
    let hashes: Vec<String> =
        pending.iter().map(|tx| tx.hash.to_owned()).collect();
    let existing = database.tx.get_by_hashes(&block.chain_id, &hashes).await?;

    let (txs, protected) = exclude_successful(pending, &existing)?;
    report.protected = protected;

    let mut transaction = database.pool.begin().await?;
    let ids = database.tx.upsert_many(&txs, &mut transaction).await?;
    let (tx_ids, account_txs) =
        plan_account_txs(&txs, &ids, &app_state.config.account_prefix);
    database
        .account_tx
        .delete_by_tx_ids(&tx_ids, &mut transaction)
        .await?;

    for range in chunk_ranges(
        account_txs.len(),
        app_state.config.account_tx_chunk_size,
    ) {
        database
            .account_tx
            .insert_many(&account_txs[range], &mut transaction)
            .await?;
    }

    transaction.commit().await?;
    report.persisted = txs.len();
    report.account_txs = account_txs.len();

    info!("collect_txs: {}, account_txs: {}", txs.len(), account_txs.len());

    Ok(())
}

/// Fetches and resolves every hash against one policy snapshot taken at the
/// block height. Hashes that fail are logged and left out.
async fn generate_tx_entities(
    app_state: &AppState<State>,
    block: &Block,
    hashes: Vec<String>,
) -> Result<Vec<Tx>, Error> {
    if hashes.is_empty() {
        return Ok(vec![]);
    }

    let policy = Arc::new(TaxPolicy::fetch(&app_state.lcd, block.height).await?);
    let capacity = NonZeroUsize::new(app_state.config.max_tasks)
        .unwrap_or(NonZeroUsize::MIN);

    let futures = hashes.into_iter().map(|hash| {
        let app_state = app_state.clone();
        let policy = policy.clone();
        let chain_id = block.chain_id.to_owned();
        let block_id = block.id;

        async move {
            let result = generate_tx_entity(
                &app_state, &policy, &hash, chain_id, block_id,
            )
            .await;
            (hash, result)
        }
    });

    let (txs, _) = partition_results(join_bounded(futures, capacity).await?);

    Ok(txs)
}

/// Keeps every resolved tx in order. Failed hashes are logged and counted.
pub fn partition_results(
    results: Vec<(String, Result<Tx, Error>)>,
) -> (Vec<Tx>, usize) {
    let mut txs = Vec::with_capacity(results.len());
    let mut skipped = 0;

    for (hash, result) in results {
        match result {
            Ok(tx) => txs.push(tx),
            Err(err) => {
                error!("collect_txs: skipping tx {}: {}", hash, err);
                skipped += 1;
            },
        }
    }

    (txs, skipped)
}

/// Every written tx id, paired with the account index rows derived from the
/// payload that was written under it. All of the ids are cleared before the
/// rows are inserted again.
pub fn plan_account_txs(
    txs: &[Tx],
    ids: &[(i64, String)],
    prefix: &str,
) -> (Vec<i64>, Vec<Account_Tx>) {
    let ids: HashMap<&str, i64> =
        ids.iter().map(|(id, hash)| (hash.as_str(), *id)).collect();
    let mut tx_ids = Vec::with_capacity(txs.len());
    let mut account_txs = Vec::new();

    for tx in txs {
        if let Some(id) = ids.get(tx.hash.as_str()) {
            tx_ids.push(*id);
            account_txs.extend(generate_account_txs(tx, *id, prefix));
        }
    }

    (tx_ids, account_txs)
}

/// Consecutive ranges covering `len` rows, none longer than `chunk_size`.
pub fn chunk_ranges(len: usize, chunk_size: usize) -> Vec<Range<usize>> {
    let chunk_size = chunk_size.max(1);

    (0..len)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(len))
        .collect()
}

async fn generate_tx_entity(
    app_state: &AppState<State>,
    policy: &TaxPolicy,
    hash: &str,
    chain_id: String,
    block_id: i64,
) -> Result<Tx, Error> {
    let lcd_tx = app_state.lcd.get_tx(hash).await?;
    let lcd_tx = tax::resolve(
        lcd_tx,
        policy,
        &chain_id,
        &app_state.config.bond_denom,
    )?;

    let timestamp =
        DateTime::parse_from_rfc3339(&lcd_tx.timestamp)?.with_timezone(&Utc);
    let hash = lcd_tx.txhash.to_lowercase();

    let mut data = serde_json::to_value(&lcd_tx)?;
    sanitize(&mut data);

    Ok(Tx {
        chain_id,
        hash,
        data: Json(data),
        timestamp,
        block_id,
    })
}

/// Drops every pending tx whose stored version already succeeded. Returns
/// the remaining write set and the number dropped.
pub fn exclude_successful(
    mut pending: Vec<Tx>,
    existing: &[Tx],
) -> Result<(Vec<Tx>, usize), Error> {
    let mut protected = 0;

    for stored in existing.iter().filter(|tx| tx.is_successful()) {
        let Some(index) =
            pending.iter().position(|tx| tx.hash == stored.hash)
        else {
            return Err(Error::ImpossibleState(format!(
                "successful tx {} is not in the write set",
                stored.hash
            )));
        };

        info!("collect_txs: existing successful tx found: {}", stored.hash);
        pending.remove(index);
        protected += 1;
    }

    Ok((pending, protected))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::{json, Value};

    use super::*;

    fn tx(hash: &str, data: Value) -> Tx {
        Tx {
            chain_id: String::from("columbus-5"),
            hash: hash.to_owned(),
            data: Json(data),
            timestamp: Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap(),
            block_id: 1,
        }
    }

    #[test]
    fn test_unique_hashes_lowercases_and_dedupes() {
        let hashes = vec![
            String::from("ABC"),
            String::from("def"),
            String::from("abc"),
            String::from(" "),
            String::from("DEF"),
        ];

        assert_eq!(
            unique_hashes(&hashes),
            vec![String::from("abc"), String::from("def")]
        );
    }

    #[test]
    fn test_exclude_successful_keeps_failed_and_new() {
        let pending = vec![
            tx("a", json!({"code": 5})),
            tx("b", json!({})),
            tx("c", json!({})),
        ];
        let existing = vec![tx("a", json!({})), tx("b", json!({"code": 11}))];

        let (txs, protected) = exclude_successful(pending, &existing).unwrap();
        let hashes: Vec<&str> = txs.iter().map(|tx| tx.hash.as_str()).collect();

        assert_eq!(protected, 1);
        assert_eq!(hashes, vec!["b", "c"]);
    }

    #[test]
    fn test_exclude_successful_missing_pending_is_impossible() {
        let pending = vec![tx("a", json!({}))];
        let existing = vec![tx("z", json!({"code": 0}))];

        assert!(matches!(
            exclude_successful(pending, &existing),
            Err(Error::ImpossibleState(_))
        ));
    }

    #[test]
    fn test_exclude_successful_failed_stored_is_overwritten() {
        let pending = vec![tx("a", json!({}))];
        let existing = vec![tx("a", json!({"code": 3}))];

        let (txs, protected) = exclude_successful(pending, &existing).unwrap();

        assert_eq!(protected, 0);
        assert_eq!(txs.len(), 1);
    }

    #[test]
    fn test_partition_results_keeps_resolved_and_counts_skipped() {
        let results = vec![
            (String::from("a"), Ok(tx("a", json!({})))),
            (
                String::from("b"),
                Err(Error::TaxFieldNotFound {
                    msg_type: String::from("wasm/MsgExecuteContract"),
                    height: String::from("100"),
                    hash: String::from("b"),
                }),
            ),
            (String::from("c"), Ok(tx("c", json!({})))),
            (
                String::from("d"),
                Err(Error::AnnotationLengthMismatch {
                    logs: 2,
                    messages: 1,
                }),
            ),
        ];

        let (txs, skipped) = partition_results(results);
        let hashes: Vec<&str> = txs.iter().map(|tx| tx.hash.as_str()).collect();

        assert_eq!(hashes, vec!["a", "c"]);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_chunk_ranges_splits_remainder_into_last_chunk() {
        let ranges = chunk_ranges(10_001, 5_000);
        let sizes: Vec<usize> = ranges.iter().map(|range| range.len()).collect();

        assert_eq!(sizes, vec![5_000, 5_000, 1]);
        assert_eq!(ranges[2], 10_000..10_001);
        assert!(chunk_ranges(0, 5_000).is_empty());
        assert_eq!(chunk_ranges(3, 0).len(), 3);
    }

    #[test]
    fn test_plan_account_txs_clears_every_written_tx() {
        const ALICE: &str = "terra1dcegyrekltswvyy0xy69ydgxn9x8x32zdtapd8";

        let txs = vec![
            tx(
                "a",
                json!({
                    "tx": {"value": {"msg": [{"value": {"from_address": ALICE}}]}}
                }),
            ),
            tx("b", json!({"code": 5})),
        ];
        let ids = vec![(11, String::from("b")), (10, String::from("a"))];

        let (tx_ids, rows) = plan_account_txs(&txs, &ids, "terra");

        assert_eq!(tx_ids, vec![10, 11]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].account, ALICE);
        assert_eq!(rows[0].tx_id, 10);
    }
}
