use tracing::info;

use crate::{
    configuration::{AppState, State},
    error::Error,
    helpers::{
        add_date_to_data, to_documents, today, List_Kind, GENERAL_INFO_DATABASE,
    },
};

/// Replaces the staged copy of a canonical list with today's version.
pub async fn fetch_insert(
    app_state: AppState<State>,
    kind: List_Kind,
) -> Result<usize, Error> {
    let data = app_state.http.get_list(kind).await?;

    if data.is_empty() {
        return Err(Error::Validation(format!(
            "{} list is empty, {} kept as is",
            kind,
            kind.collection()
        )));
    }

    let data = add_date_to_data(data, &today())?;
    let documents = to_documents(data)?;
    let count = app_state
        .documents
        .replace_collection(GENERAL_INFO_DATABASE, kind.collection(), documents)
        .await?;

    info!("{}: stored {} entries", kind.collection(), count);

    Ok(count)
}
