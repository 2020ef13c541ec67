use serde::{Deserialize, Serialize};

/// Entry of a canonical symbol list as staged in `ingestion-general_info`.
///
/// Stock lists publish `exchange`, the crypto list publishes `stockExchange`;
/// both land in `exchange`. `date` is the ingestion stamp and becomes the
/// warehouse `as_of_date`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "stockExchange")]
    pub exchange: Option<String>,
    #[serde(default)]
    pub exchange_short_name: Option<String>,
    #[serde(default, rename = "type")]
    pub r#type: Option<String>,
    pub date: String,
}
