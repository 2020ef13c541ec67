use std::{env::VarError, io::Error as IO_ERROR, num::ParseIntError};

use anyhow::Error as ANYHOW_ERROR;
use bigdecimal::ParseBigDecimalError as BIG_DECIMAL_ERROR;
use chrono::ParseError as CHRONO_PARSE_ERROR;
use mongodb::bson::{
    de::Error as BSON_DE_ERROR, document::ValueAccessError,
    ser::Error as BSON_SER_ERROR,
};
use mongodb::error::Error as MONGO_ERROR;
use reqwest::{Error as REQWEST_ERROR, StatusCode};
use serde_json::Error as JSON_ERROR;
use sqlx::error::Error as SQL_ERROR;
use thiserror::Error;
use tokio::task::JoinError;
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
    Mongo(#[from] MONGO_ERROR),

    #[error("Bson decode error: {0}")]
    BsonDecode(#[from] BSON_DE_ERROR),

    #[error("Bson encode error: {0}")]
    BsonEncode(#[from] BSON_SER_ERROR),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    BigDecimalError(#[from] BIG_DECIMAL_ERROR),

    #[error("Decode date: {0}")]
    DecodeDateError(#[from] CHRONO_PARSE_ERROR),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("{0}")]
    ReqwestError(#[from] REQWEST_ERROR),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("{0}")]
    AnyHowError(#[from] ANYHOW_ERROR),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Ambiguous record: {0}")]
    AmbiguousRecord(String),

    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("The database '{database}' does not exist")]
    MissingDatabase { database: String },

    #[error(
        "The collection '{collection}' does not exist in the '{database}' database"
    )]
    MissingCollection { database: String, collection: String },

    #[error("Unexpected response {status} from {endpoint}")]
    UnexpectedResponse { endpoint: String, status: StatusCode },

    #[error("Invalid option {option}")]
    InvalidOption { option: String },

    #[error("Task error: {0}")]
    TaskError(String),
}

impl From<ValueAccessError> for Error {
    fn from(error: ValueAccessError) -> Self {
        Error::Validation(error.to_string())
    }
}
