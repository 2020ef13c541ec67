use tracing::info;

use crate::{
    configuration::{AppState, State},
    error::Error,
    helpers::Asset_Class,
    model::Sync_Result,
    provider::Synchronization,
};

pub async fn synchronize(
    app_state: AppState<State>,
    class: Asset_Class,
    symbol: &str,
) -> Result<Sync_Result, Error> {
    let sync = Synchronization::new(&app_state.documents, &app_state.database);
    sync.synchronize(class, &symbol.to_uppercase()).await
}

/// Synchronizes every staged collection of `class`. Fails once all symbols
/// were attempted if any of them failed.
pub async fn synchronize_all(
    app_state: AppState<State>,
    class: Asset_Class,
) -> Result<Vec<Sync_Result>, Error> {
    let sync = Synchronization::new(&app_state.documents, &app_state.database);
    let (results, failures) = sync.synchronize_all(class).await?;

    let inserted: usize = results.iter().map(|item| item.inserted.len()).sum();
    info!(
        "{}: {} symbols synchronized, {} rows inserted",
        class,
        results.len(),
        inserted
    );

    if !failures.is_empty() {
        let symbols: Vec<&str> =
            failures.iter().map(|(symbol, _)| symbol.as_str()).collect();
        return Err(Error::TaskError(format!(
            "{}: {} of {} symbols failed ({})",
            class,
            failures.len(),
            failures.len() + results.len(),
            symbols.join(", ")
        )));
    }

    Ok(results)
}
