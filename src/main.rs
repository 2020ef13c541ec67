use clap::Parser;
use tracing::{error, Level};

use asset_flow::{
    cli::{
        run_ingest, run_pipeline, run_schedule, run_standardize,
        run_store_company_info, run_store_list, Cli, Commands,
    },
    error::Error,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level({
            #[cfg(debug_assertions)]
            {
                Level::INFO
            }

            #[cfg(not(debug_assertions))]
            {
                Level::INFO
            }
        })
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Schedule) {
        Commands::Schedule => run_schedule().await,
        Commands::StoreList { kind } => run_store_list(kind).await,
        Commands::StoreCompanyInfo { query } => {
            run_store_company_info(query).await
        },
        Commands::Ingest { class, symbol } => run_ingest(class, symbol).await,
        Commands::Standardize {
            class,
            symbol,
            all,
        } => run_standardize(class, symbol, all).await,
        Commands::Run { class } => run_pipeline(class).await,
    }
}
