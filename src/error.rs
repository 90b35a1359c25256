use anyhow::Error as ANYHOW_ERROR;
use bigdecimal::ParseBigDecimalError as BIG_DECIMAL_ERROR;
use chrono::ParseError as CHRONO_PARSE_ERROR;
use reqwest::Error as REQWEST_ERROR;
use serde_json::Error as JSON_ERROR;
use sqlx::error::Error as SQL_ERROR;
use std::{env::VarError, io::Error as IO_ERROR, num::ParseIntError};
use thiserror::Error;
use tokio::task::JoinError;
use tonic::transport::Error as TRANSPORT_ERROR;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;
use url::ParseError as URL_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    URL(#[from] URL_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    SQL(#[from] SQL_ERROR),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    REQWEST(#[from] REQWEST_ERROR),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    BigDecimalError(#[from] BIG_DECIMAL_ERROR),

    #[error("{0}")]
    DateTimeParseError(#[from] CHRONO_PARSE_ERROR),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("{0}")]
    TransportError(#[from] TRANSPORT_ERROR),

    #[error("{0}")]
    AnyHowError(#[from] ANYHOW_ERROR),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("Field not exists: {0}")]
    FieldNotExist(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    #[error("Invalid coin: {0}")]
    InvalidCoin(String),

    #[error(
        "cannot find tax field in msg: {msg_type}, height: {height}, txhash: {hash}"
    )]
    TaxFieldNotFound {
        msg_type: String,
        height: String,
        hash: String,
    },

    #[error("logs and tax array length must be equal: {logs} logs, {messages} messages")]
    AnnotationLengthMismatch { logs: usize, messages: usize },

    #[error("Impossible state: {0}")]
    ImpossibleState(String),

    #[error("Block not found: {0}")]
    BlockNotFound(i64),
}
