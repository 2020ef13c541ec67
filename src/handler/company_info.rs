use tracing::info;

use crate::{
    configuration::{AppState, State},
    error::Error,
    helpers::{
        add_date_to_data, to_documents, today,
        COMPANY_GENERAL_INFO_COLLECTION, GENERAL_INFO_DATABASE,
    },
};

pub async fn fetch_insert(
    app_state: AppState<State>,
    query: &str,
) -> Result<usize, Error> {
    let data = app_state.http.search_company(query).await?;
    let data = add_date_to_data(data, &today())?;
    let documents = to_documents(data)?;

    let count = app_state
        .documents
        .replace_collection(
            GENERAL_INFO_DATABASE,
            COMPANY_GENERAL_INFO_COLLECTION,
            documents,
        )
        .await?;

    info!(
        "{}: stored {} matches for '{}'",
        COMPANY_GENERAL_INFO_COLLECTION, count, query
    );

    Ok(count)
}
