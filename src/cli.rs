//! CLI module for the asset-flow pipeline
//!
//! Every command opens its own run state (document store client, postgres
//! pool, http client) and closes it before returning.

use std::future::Future;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use crate::{
    configuration::{
        get_configuration, set_configuration, AppState, Config, State,
    },
    error::Error,
    handler::{company_info, daily_prices, pipeline, standardize, store_list},
    helpers::{Asset_Class, List_Kind},
};

/// Financial market data ETL
#[derive(Parser)]
#[command(name = "asset-flow")]
#[command(
    about = "Stages FMP market data in mongodb and syncs it into postgres",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the pipeline for both classes on a fixed interval (default)
    Schedule,

    /// Replace a staged symbol list (stock, crypto or etf)
    StoreList { kind: List_Kind },

    /// Stage company search results
    StoreCompanyInfo {
        /// Search query, defaults to COMPANY_SEARCH_QUERY
        query: Option<String>,
    },

    /// Stage the daily price history of one symbol
    Ingest { class: Asset_Class, symbol: String },

    /// Sync staged prices into the warehouse
    Standardize {
        class: Asset_Class,

        #[arg(required_unless_present = "all", conflicts_with = "all")]
        symbol: Option<String>,

        /// Every staged symbol of the class
        #[arg(long)]
        all: bool,
    },

    /// Store the list, then ingest and standardize every configured symbol
    Run {
        /// Both classes when omitted
        class: Option<Asset_Class>,
    },
}

/// Initialize configuration and return Config
pub fn init_config() -> Result<Config, Error> {
    set_configuration()?;
    get_configuration()
}

async fn with_state<F, Fut, T>(task: F) -> Result<T, Error>
where
    F: FnOnce(AppState<State>) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let config = init_config()?;
    let app_state = AppState::new(State::new(config).await?);

    let result = task(app_state.clone()).await;
    app_state.close().await;

    result
}

pub async fn run_store_list(kind: List_Kind) -> Result<(), Error> {
    with_state(|app_state| async move {
        store_list::fetch_insert(app_state, kind).await?;
        Ok::<(), Error>(())
    })
    .await
}

pub async fn run_store_company_info(query: Option<String>) -> Result<(), Error> {
    with_state(|app_state| async move {
        let query =
            query.unwrap_or_else(|| app_state.config.company_search_query.clone());
        company_info::fetch_insert(app_state, &query).await?;
        Ok::<(), Error>(())
    })
    .await
}

pub async fn run_ingest(class: Asset_Class, symbol: String) -> Result<(), Error> {
    with_state(|app_state| async move {
        daily_prices::fetch_insert(app_state, class, &symbol).await?;
        Ok::<(), Error>(())
    })
    .await
}

pub async fn run_standardize(
    class: Asset_Class,
    symbol: Option<String>,
    all: bool,
) -> Result<(), Error> {
    with_state(|app_state| async move {
        match (symbol, all) {
            (_, true) => {
                standardize::synchronize_all(app_state, class).await?;
            },
            (Some(symbol), false) => {
                let result =
                    standardize::synchronize(app_state, class, &symbol).await?;
                info!(
                    "{} {}: {} rows inserted ({})",
                    class,
                    result.symbol,
                    result.inserted.len(),
                    result.mode
                );
            },
            (None, false) => {
                return Err(Error::InvalidOption {
                    option: String::from("standardize needs a symbol or --all"),
                });
            },
        }
        Ok::<(), Error>(())
    })
    .await
}

pub async fn run_pipeline(class: Option<Asset_Class>) -> Result<(), Error> {
    let classes = match class {
        Some(class) => vec![class],
        None => vec![Asset_Class::Stock, Asset_Class::Crypto],
    };

    with_state(|app_state| async move {
        let mut failed = vec![];

        for class in classes {
            if let Err(e) = pipeline::run(app_state.clone(), class).await {
                error!("{}", e);
                failed.push(class.as_str());
            }
        }

        if !failed.is_empty() {
            return Err(Error::TaskError(format!(
                "pipeline failed for {}",
                failed.join(", ")
            )));
        }

        Ok::<(), Error>(())
    })
    .await
}

pub async fn run_schedule() -> Result<(), Error> {
    with_state(pipeline::schedule_task).await
}
