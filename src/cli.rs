//! CLI module for the reward ETL
//!
//! Runs schema migrations, ingests the transactions of one block and
//! aggregates the reward ledger of one minute.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::{
    configuration::{
        get_configuration, set_configuration, AppState, Config, State,
    },
    error::Error,
    handler::{reward, tx},
    helpers::MinuteWindow,
    provider::{DatabasePool, Grpc, Lcd},
};

/// Terra Classic reward ETL
#[derive(Parser)]
#[command(name = "reward-etl")]
#[command(about = "Tax resolution and reward aggregation", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply the database schema
    Migrate,

    /// Fetch, resolve and store the transactions of a block
    Ingest {
        /// Height of an already stored block
        #[arg(long)]
        height: i64,

        /// Transaction hashes to ingest. Read from the block when omitted.
        #[arg(long = "hash")]
        hashes: Vec<String>,
    },

    /// Write the reward ledger of one minute
    Aggregate {
        /// RFC3339 instant inside the minute. Defaults to the previous minute.
        #[arg(long)]
        timestamp: Option<String>,
    },
}

/// Initialize configuration and return Config
pub fn init_config() -> Result<Config, Error> {
    set_configuration()?;
    get_configuration()
}

async fn init_state(config: Config) -> Result<AppState<State>, Error> {
    let database = DatabasePool::new(&config).await?;
    let lcd = Lcd::new(config.clone())?;
    let grpc = Grpc::new(config.clone()).await?;
    let state = State::new(config, database, lcd, grpc).await?;

    Ok(AppState::new(state))
}

pub async fn run_migrate() -> Result<(), Error> {
    let config = init_config()?;
    let database = DatabasePool::new(&config).await?;

    info!("Running database migrations...");
    State::init_migrations(&database).await?;
    info!("Migrations complete");

    Ok(())
}

pub async fn run_ingest(height: i64, hashes: Vec<String>) -> Result<(), Error> {
    let config = init_config()?;
    let app_state = init_state(config).await?;

    let block = app_state
        .database
        .block
        .get_by_height(&app_state.config.chain_id, height)
        .await?
        .ok_or(Error::BlockNotFound(height))?;

    let hashes = if hashes.is_empty() {
        app_state.grpc.get_block_tx_hashes(height).await?
    } else {
        hashes
    };

    let report = tx::ingest_block(&app_state, &block, &hashes).await?;

    info!(
        "ingest {}: attempted {}, fetched {}, protected {}, persisted {}, account_txs {}",
        height,
        report.attempted,
        report.fetched,
        report.protected,
        report.persisted,
        report.account_txs
    );

    Ok(())
}

pub async fn run_aggregate(timestamp: Option<String>) -> Result<(), Error> {
    let timestamp = parse_timestamp(timestamp.as_deref(), Utc::now())?;
    let config = init_config()?;
    let app_state = init_state(config).await?;

    let report = reward::aggregate_reward_window(&app_state, timestamp).await?;

    info!(
        "aggregate {}: rows {}, swap fee denoms {}",
        report.datetime,
        report.rows.len(),
        report.swap_fee.len()
    );

    Ok(())
}

fn parse_timestamp(
    value: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, Error> {
    match value {
        Some(value) => {
            Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
        },
        None => Ok(MinuteWindow::previous(now)?.from),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_cli_parses_ingest_hashes() {
        let cli = Cli::parse_from([
            "reward-etl",
            "ingest",
            "--height",
            "42",
            "--hash",
            "AA",
            "--hash",
            "BB",
        ]);

        match cli.command {
            Commands::Ingest { height, hashes } => {
                assert_eq!(height, 42);
                assert_eq!(hashes, vec![String::from("AA"), String::from("BB")]);
            },
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn test_parse_timestamp_defaults_to_previous_minute() {
        let now = Utc.with_ymd_and_hms(2022, 1, 1, 10, 5, 30).unwrap();

        assert_eq!(
            parse_timestamp(None, now).unwrap(),
            Utc.with_ymd_and_hms(2022, 1, 1, 10, 4, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp(Some("2022-01-01T09:00:15Z"), now).unwrap(),
            Utc.with_ymd_and_hms(2022, 1, 1, 9, 0, 15).unwrap()
        );
        assert!(parse_timestamp(Some("yesterday"), now).is_err());
    }
}
