//! Warehouse entities and synchronization outcomes.

use std::{fmt, str::FromStr};

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use crate::{
    error::Error,
    helpers::{parse_date, Asset_Class},
    types::{Listing, Staged_Price},
};

// =============================================================================
// ASSET DOMAIN
// =============================================================================

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub asset_id: i64,
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: Option<String>,
    pub exchange_short_name: Option<String>,
    #[sqlx(rename = "type")]
    pub r#type: String,
    pub as_of_date: NaiveDate,
}

/// Descriptive fields of an asset, without its warehouse identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset_Info {
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: Option<String>,
    pub exchange_short_name: Option<String>,
    pub r#type: String,
    pub as_of_date: NaiveDate,
}

impl Asset_Info {
    /// Crypto listings carry no type, every crypto asset is typed `crypto`.
    pub fn from_listing(
        class: Asset_Class,
        listing: &Listing,
    ) -> Result<Asset_Info, Error> {
        let r#type = match class {
            Asset_Class::Crypto => class.as_str().to_owned(),
            Asset_Class::Stock => listing
                .r#type
                .clone()
                .unwrap_or_else(|| class.as_str().to_owned()),
        };

        let as_of_date = parse_date(&listing.date).map_err(|e| {
            Error::Validation(format!(
                "listing {} has invalid date '{}': {}",
                listing.symbol, listing.date, e
            ))
        })?;

        Ok(Asset_Info {
            symbol: listing.symbol.to_owned(),
            name: listing.name.clone(),
            exchange: listing.exchange.clone(),
            exchange_short_name: listing.exchange_short_name.clone(),
            r#type,
            as_of_date,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset_Upsert {
    pub asset_id: i64,
    pub created: bool,
}

// =============================================================================
// PRICE DOMAIN
// =============================================================================

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Price_Record {
    pub asset_id: i64,
    pub symbol: String,
    pub date: NaiveDate,
    pub open: BigDecimal,
    pub high: BigDecimal,
    pub low: BigDecimal,
    pub close: BigDecimal,
    pub adj_close: BigDecimal,
    pub volume: BigDecimal,
    pub unadjusted_volume: BigDecimal,
    pub change: BigDecimal,
    pub change_percent: BigDecimal,
    pub vwap: BigDecimal,
    pub label: String,
    pub change_over_time: BigDecimal,
    pub as_of_date: NaiveDate,
}

impl Price_Record {
    pub fn from_staged(
        asset_id: i64,
        symbol: &str,
        as_of_date: NaiveDate,
        staged: &Staged_Price,
    ) -> Result<Price_Record, Error> {
        let price = &staged.price;
        let date = parse_date(&price.date).map_err(|e| {
            Error::Validation(format!(
                "staged {} row has invalid date '{}': {}",
                symbol, price.date, e
            ))
        })?;

        Ok(Price_Record {
            asset_id,
            symbol: symbol.to_owned(),
            date,
            open: decimal(price.open)?,
            high: decimal(price.high)?,
            low: decimal(price.low)?,
            close: decimal(price.close)?,
            adj_close: decimal(price.adj_close)?,
            volume: decimal(price.volume)?,
            unadjusted_volume: decimal(price.unadjusted_volume)?,
            change: decimal(price.change)?,
            change_percent: decimal(price.change_percent)?,
            vwap: decimal(price.vwap)?,
            label: price.label.to_owned(),
            change_over_time: decimal(price.change_over_time)?,
            as_of_date,
        })
    }
}

/// Goes through the shortest round-trip text form of the float, so `42166.9`
/// is stored as `42166.9` rather than its binary expansion.
fn decimal(value: f64) -> Result<BigDecimal, Error> {
    Ok(BigDecimal::from_str(&value.to_string())?)
}

/// Min/max price date of one symbol in the warehouse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct Date_Range {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

// =============================================================================
// SYNCHRONIZATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sync_Mode {
    FullBackfill,
    Incremental { after: NaiveDate },
}

impl fmt::Display for Sync_Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sync_Mode::FullBackfill => write!(f, "full-backfill"),
            Sync_Mode::Incremental { after } => {
                write!(f, "incremental after {}", after)
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sync_Result {
    pub symbol: String,
    pub asset_id: i64,
    pub asset_created: bool,
    pub mode: Sync_Mode,
    pub inserted: Vec<NaiveDate>,
}

impl Sync_Result {
    pub fn is_noop(&self) -> bool {
        self.inserted.is_empty()
    }
}
