use std::{env, fs, ops::Deref, str::FromStr, sync::Arc};

use crate::{
    constants::{
        DEFAULT_ACCOUNT_PREFIX, DEFAULT_ACCOUNT_TX_CHUNK_SIZE,
        DEFAULT_BOND_DENOM, DEFAULT_STABLE_DENOM,
    },
    dao::read_migration,
    error::Error,
    provider::{DatabasePool, Grpc, Lcd},
};

const MIGRATIONS: [&str; 5] = [
    "block.sql",
    "tx.sql",
    "account_tx.sql",
    "price.sql",
    "reward.sql",
];

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub database: DatabasePool,
    pub lcd: Lcd,
    pub grpc: Grpc,
}

impl State {
    pub async fn new(
        config: Config,
        database: DatabasePool,
        lcd: Lcd,
        grpc: Grpc,
    ) -> Result<State, Error> {
        Self::init_migrations(&database).await?;
        Ok(Self {
            config,
            database,
            lcd,
            grpc,
        })
    }

    pub async fn init_migrations(database: &DatabasePool) -> Result<(), Error> {
        let dir = env!("CARGO_MANIFEST_DIR");

        for file in MIGRATIONS {
            let data = read_migration(dir, file)?;
            sqlx::raw_sql(&data).execute(&database.pool).await?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub chain_id: String,
    pub lcd_host: String,
    pub grpc_host: String,
    pub timeout: u64,
    pub max_tasks: usize,
    pub account_tx_chunk_size: usize,
    pub bond_denom: String,
    pub stable_denom: String,
    pub account_prefix: String,
}

pub fn get_configuration() -> Result<Config, Error> {
    let database_url = env::var("DATABASE_URL")?;
    let db_max_connections = env_or("DB_MAX_CONNECTIONS", 10)?;
    let chain_id = env::var("CHAIN_ID")?;
    let lcd_host = env::var("LCD_HOST")?;
    let grpc_host = env::var("GRPC_HOST")?;
    let timeout = env::var("TIMEOUT")?.parse()?;
    let max_tasks = env::var("MAX_TASKS")?.parse()?;
    let account_tx_chunk_size =
        env_or("ACCOUNT_TX_CHUNK_SIZE", DEFAULT_ACCOUNT_TX_CHUNK_SIZE)?;
    let bond_denom = env_string_or("BOND_DENOM", DEFAULT_BOND_DENOM);
    let stable_denom = env_string_or("STABLE_DENOM", DEFAULT_STABLE_DENOM);
    let account_prefix =
        env_string_or("ACCOUNT_PREFIX", DEFAULT_ACCOUNT_PREFIX);

    if max_tasks == 0 {
        return Err(Error::ConfigurationError(String::from(
            "MAX_TASKS must be greater than zero",
        )));
    }

    if account_tx_chunk_size == 0 {
        return Err(Error::ConfigurationError(String::from(
            "ACCOUNT_TX_CHUNK_SIZE must be greater than zero",
        )));
    }

    let config = Config {
        database_url,
        db_max_connections,
        chain_id,
        lcd_host,
        grpc_host,
        timeout,
        max_tasks,
        account_tx_chunk_size,
        bond_denom,
        stable_denom,
        account_prefix,
    };

    Ok(config)
}

fn env_or<T>(key: &str, default: T) -> Result<T, Error>
where
    T: FromStr,
    Error: From<T::Err>,
{
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().parse()?),
        _ => Ok(default),
    }
}

fn env_string_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_owned(),
        _ => default.to_owned(),
    }
}

pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";
    let etl_config_file: &str = "etl.conf";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);
    let etl_config_path = format!("{}/{}", directory, etl_config_file);

    let etl_config_string = fs::read_to_string(etl_config_path)?;
    parse_config_string(&etl_config_string);

    if let Ok(config_string) = fs::read_to_string(path) {
        parse_config_string(&config_string);
    }

    Ok(())
}

fn parse_config_string(config: &str) {
    for (key, value) in parse_pairs(config) {
        env::set_var(key, value);
    }
}

fn parse_pairs(config: &str) -> Vec<(&str, &str)> {
    config
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect()
}
