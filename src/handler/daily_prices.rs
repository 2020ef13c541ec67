use tracing::info;

use crate::{
    configuration::{AppState, State},
    error::Error,
    helpers::{
        find_min_max_dates, rows_after, Asset_Class, GENERAL_INFO_DATABASE,
    },
    types::{Historical_Price, Staged_Price},
};

/// Stages the daily price history of `symbol`, appending only days newer
/// than what the staging collection already holds.
pub async fn fetch_insert(
    app_state: AppState<State>,
    class: Asset_Class,
    symbol: &str,
) -> Result<usize, Error> {
    let symbol = symbol.to_uppercase();
    let list = class.list_kind().collection();

    let listed = app_state
        .documents
        .find_by_key_value(GENERAL_INFO_DATABASE, list, "symbol", &symbol)
        .await?;

    if listed.is_empty() {
        return Err(Error::NotFound(format!("symbol {} in {}", symbol, list)));
    }

    let fetched = app_state.http.get_historical_prices(&symbol).await?;

    let database = class.price_database();
    let collection = class.collection(&symbol);
    let documents = &app_state.documents;

    let staged = documents.collection_exists(database, &collection).await?;
    let existing_max = if staged {
        documents
            .min_max_dates(database, &collection, "date")
            .await?
            .map(|(_, max)| max)
    } else {
        None
    };

    let rows = match plan_staging(existing_max.as_deref(), fetched) {
        Some(rows) => rows,
        None => {
            info!("{}/{}: no new rows", database, collection);
            return Ok(0);
        },
    };

    let (min, max) = find_min_max_dates(&rows, "date")?;
    let data = rows
        .into_iter()
        .map(|price| Staged_Price::new(&symbol, price).to_document(class))
        .collect::<Result<Vec<_>, Error>>()?;

    let count = documents.insert_many(database, &collection, data).await?;

    info!(
        "{}/{}: staged {} rows from {} to {}",
        database, collection, count, min, max
    );

    Ok(count)
}

/// Rows to stage given the newest date already staged. `None` means there is
/// nothing to write.
pub fn plan_staging(
    existing_max: Option<&str>,
    fetched: Vec<Historical_Price>,
) -> Option<Vec<Historical_Price>> {
    let rows = match existing_max {
        Some(max) => rows_after(fetched, max),
        None => fetched,
    };

    if rows.is_empty() {
        return None;
    }

    Some(rows)
}
