use serde::{Deserialize, Serialize};

use crate::helpers::Dated;

#[derive(Debug, Deserialize)]
pub struct Historical_Price_Body {
    pub symbol: Option<String>,
    pub historical: Option<Vec<Historical_Price>>,
}

/// One trading day of `historical-price-full`, kept in the API's field naming.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Historical_Price {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
    pub unadjusted_volume: f64,
    pub change: f64,
    pub change_percent: f64,
    pub vwap: f64,
    pub label: String,
    pub change_over_time: f64,
}

impl Dated for Historical_Price {
    fn date(&self) -> &str {
        &self.date
    }
}
