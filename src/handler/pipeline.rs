use futures::future::join_all;
use tokio::time;
use tracing::{error, info};

use crate::{
    configuration::{schedule_period, AppState, State},
    error::Error,
    handler::{daily_prices, standardize, store_list},
    helpers::Asset_Class,
    model::Sync_Result,
};

/// Refreshes the class list, then stages and synchronizes every configured
/// symbol. Symbols run concurrently, each one at most once.
pub async fn run(
    app_state: AppState<State>,
    class: Asset_Class,
) -> Result<(), Error> {
    store_list::fetch_insert(app_state.clone(), class.list_kind()).await?;

    let symbols = app_state.config.symbols(class).to_vec();
    let tasks = symbols
        .iter()
        .map(|symbol| process_symbol(app_state.clone(), class, symbol));

    let mut failed = vec![];

    for (symbol, result) in symbols.iter().zip(join_all(tasks).await) {
        match result {
            Ok(result) => {
                info!(
                    "{} {}: done, {} new rows",
                    class,
                    symbol,
                    result.inserted.len()
                );
            },
            Err(e) => {
                error!("{} {}: {}", class, symbol, e);
                failed.push(symbol.as_str());
            },
        }
    }

    if !failed.is_empty() {
        return Err(Error::TaskError(format!(
            "{} run failed for {}",
            class,
            failed.join(", ")
        )));
    }

    Ok(())
}

async fn process_symbol(
    app_state: AppState<State>,
    class: Asset_Class,
    symbol: &str,
) -> Result<Sync_Result, Error> {
    daily_prices::fetch_insert(app_state.clone(), class, symbol).await?;
    standardize::synchronize(app_state, class, symbol).await
}

/// Runs both classes now and then once per configured interval.
pub async fn schedule_task(app_state: AppState<State>) -> Result<(), Error> {
    let period = schedule_period(app_state.config.schedule_interval)?;
    let mut interval = time::interval(period);

    tokio::spawn(async move {
        loop {
            interval.tick().await;

            for class in [Asset_Class::Stock, Asset_Class::Crypto] {
                if let Err(e) = run(app_state.clone(), class).await {
                    error!("Scheduled {} run: {}", class, e);
                }
            }
        }
    })
    .await?;

    Ok(())
}
