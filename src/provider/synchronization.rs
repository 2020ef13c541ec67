use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{error, info};

use crate::{
    error::Error,
    helpers::{format_date, Asset_Class, Dated},
    model::{
        Asset_Info, Asset_Upsert, Date_Range, Price_Record, Sync_Mode,
        Sync_Result,
    },
    types::{Listing, Staged_Price},
};

/// Read side of the document store as seen by the synchronizer.
#[async_trait]
pub trait Staging: Send + Sync {
    /// Canonical list entries whose `symbol` equals `symbol`.
    async fn find_listings(
        &self,
        class: Asset_Class,
        symbol: &str,
    ) -> Result<Vec<Listing>, Error>;

    /// Staged rows of `symbol`. `None` loads the whole collection, `Some(d)`
    /// only rows dated strictly after `d`.
    async fn staged_prices(
        &self,
        class: Asset_Class,
        symbol: &str,
        after: Option<NaiveDate>,
    ) -> Result<Vec<Staged_Price>, Error>;

    /// Symbols owning a staging collection in the class's price database.
    async fn staged_symbols(
        &self,
        class: Asset_Class,
    ) -> Result<Vec<String>, Error>;
}

/// Write side of the relational warehouse.
#[async_trait]
pub trait Warehouse: Send + Sync {
    async fn upsert_asset(&self, info: &Asset_Info)
        -> Result<Asset_Upsert, Error>;

    async fn price_coverage(
        &self,
        class: Asset_Class,
        symbol: &str,
    ) -> Result<Date_Range, Error>;

    /// Inserts all rows atomically, returns the number of rows written.
    async fn insert_prices(
        &self,
        class: Asset_Class,
        data: &[Price_Record],
    ) -> Result<u64, Error>;
}

#[derive(Debug)]
pub struct Synchronization<'a, S, W> {
    staging: &'a S,
    warehouse: &'a W,
}

impl<'a, S: Staging, W: Warehouse> Synchronization<'a, S, W> {
    pub fn new(staging: &'a S, warehouse: &'a W) -> Self {
        Synchronization { staging, warehouse }
    }

    pub async fn synchronize(
        &self,
        class: Asset_Class,
        symbol: &str,
    ) -> Result<Sync_Result, Error> {
        let listing = self.get_listing(class, symbol).await?;
        let info = Asset_Info::from_listing(class, &listing)?;

        let Asset_Upsert {
            asset_id,
            created,
        } = self.warehouse.upsert_asset(&info).await?;

        let coverage = self.warehouse.price_coverage(class, symbol).await?;
        let mode = match coverage.max {
            Some(after) => Sync_Mode::Incremental { after },
            None => Sync_Mode::FullBackfill,
        };

        let after = match mode {
            Sync_Mode::Incremental { after } => Some(after),
            Sync_Mode::FullBackfill => None,
        };

        let mut staged =
            self.staging.staged_prices(class, symbol, after).await?;
        staged.sort_by(|a, b| a.date().cmp(b.date()));

        if let Some(after) = after {
            let after = format_date(after);
            staged.retain(|item| item.date() > after.as_str());
        }

        let mut result = Sync_Result {
            symbol: symbol.to_owned(),
            asset_id,
            asset_created: created,
            mode,
            inserted: vec![],
        };

        if staged.is_empty() {
            info!("{} {}: up to date ({})", class, symbol, result.mode);
            return Ok(result);
        }

        let records = staged
            .iter()
            .map(|item| {
                Price_Record::from_staged(
                    asset_id,
                    symbol,
                    info.as_of_date,
                    item,
                )
            })
            .collect::<Result<Vec<Price_Record>, Error>>()?;

        let inserted = self.warehouse.insert_prices(class, &records).await?;
        result.inserted = records.iter().map(|item| item.date).collect();

        info!(
            "{} {}: inserted {} rows ({}), asset_id {}",
            class, symbol, inserted, result.mode, asset_id
        );

        Ok(result)
    }

    /// Synchronizes every staged symbol of `class`. A failing symbol is
    /// logged and skipped.
    pub async fn synchronize_all(
        &self,
        class: Asset_Class,
    ) -> Result<(Vec<Sync_Result>, Vec<(String, Error)>), Error> {
        let symbols = self.staging.staged_symbols(class).await?;
        let mut results = vec![];
        let mut failures = vec![];

        for symbol in symbols {
            match self.synchronize(class, &symbol).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!("{} {}: {}", class, symbol, e);
                    failures.push((symbol, e));
                },
            }
        }

        Ok((results, failures))
    }

    async fn get_listing(
        &self,
        class: Asset_Class,
        symbol: &str,
    ) -> Result<Listing, Error> {
        let mut listings = self.staging.find_listings(class, symbol).await?;

        match listings.len() {
            0 => Err(Error::NotFound(format!(
                "symbol {} in {}",
                symbol,
                class.list_kind().collection()
            ))),
            1 => Ok(listings.remove(0)),
            n => Err(Error::AmbiguousRecord(format!(
                "{} records for symbol {} in {}",
                n,
                symbol,
                class.list_kind().collection()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use super::*;
    use crate::{helpers::parse_date, types::Historical_Price};

    #[derive(Default)]
    struct MemoryStaging {
        listings: Vec<Listing>,
        prices: HashMap<String, Vec<Staged_Price>>,
    }

    impl MemoryStaging {
        fn with_listing(mut self, symbol: &str, date: &str) -> Self {
            self.listings.push(Listing {
                symbol: symbol.to_owned(),
                name: Some(format!("{} name", symbol)),
                exchange: Some(String::from("CCC")),
                exchange_short_name: Some(String::from("CRYPTO")),
                r#type: None,
                date: date.to_owned(),
            });
            self
        }

        fn with_prices(mut self, symbol: &str, dates: &[&str]) -> Self {
            let rows = dates
                .iter()
                .map(|date| Staged_Price::new(symbol, price(date)))
                .collect();
            self.prices.insert(symbol.to_owned(), rows);
            self
        }
    }

    #[async_trait]
    impl Staging for MemoryStaging {
        async fn find_listings(
            &self,
            _class: Asset_Class,
            symbol: &str,
        ) -> Result<Vec<Listing>, Error> {
            Ok(self
                .listings
                .iter()
                .filter(|item| item.symbol == symbol)
                .cloned()
                .collect())
        }

        async fn staged_prices(
            &self,
            _class: Asset_Class,
            symbol: &str,
            after: Option<NaiveDate>,
        ) -> Result<Vec<Staged_Price>, Error> {
            let rows = self.prices.get(symbol).cloned().unwrap_or_default();
            Ok(match after {
                Some(after) => {
                    let after = format_date(after);
                    rows.into_iter()
                        .filter(|item| item.date() > after.as_str())
                        .collect()
                },
                None => rows,
            })
        }

        async fn staged_symbols(
            &self,
            _class: Asset_Class,
        ) -> Result<Vec<String>, Error> {
            let mut symbols: Vec<String> =
                self.prices.keys().cloned().collect();
            symbols.sort();
            Ok(symbols)
        }
    }

    #[derive(Default)]
    struct MemoryWarehouse {
        assets: Mutex<Vec<(i64, Asset_Info)>>,
        prices: Mutex<Vec<Price_Record>>,
    }

    impl MemoryWarehouse {
        fn seed_asset(&self, asset_id: i64, info: Asset_Info) {
            self.assets.lock().unwrap().push((asset_id, info));
        }

        fn seed_prices(&self, asset_id: i64, symbol: &str, dates: &[&str]) {
            let as_of_date = parse_date("2024-01-01").unwrap();
            let mut prices = self.prices.lock().unwrap();
            for date in dates {
                let staged = Staged_Price::new(symbol, price(date));
                prices.push(
                    Price_Record::from_staged(
                        asset_id, symbol, as_of_date, &staged,
                    )
                    .unwrap(),
                );
            }
        }

        fn dates(&self, symbol: &str) -> Vec<String> {
            self.prices
                .lock()
                .unwrap()
                .iter()
                .filter(|item| item.symbol == symbol)
                .map(|item| format_date(item.date))
                .collect()
        }

        fn write_count(&self) -> (usize, usize) {
            (
                self.assets.lock().unwrap().len(),
                self.prices.lock().unwrap().len(),
            )
        }
    }

    #[async_trait]
    impl Warehouse for MemoryWarehouse {
        async fn upsert_asset(
            &self,
            info: &Asset_Info,
        ) -> Result<Asset_Upsert, Error> {
            let mut assets = self.assets.lock().unwrap();
            let matches: Vec<usize> = assets
                .iter()
                .enumerate()
                .filter(|(_, (_, item))| item.symbol == info.symbol)
                .map(|(index, _)| index)
                .collect();

            match matches.as_slice() {
                [] => {
                    let asset_id = assets.len() as i64 + 1;
                    assets.push((asset_id, info.clone()));
                    Ok(Asset_Upsert {
                        asset_id,
                        created: true,
                    })
                },
                [index] => {
                    let entry = &mut assets[*index];
                    entry.1 = info.clone();
                    Ok(Asset_Upsert {
                        asset_id: entry.0,
                        created: false,
                    })
                },
                _ => Err(Error::DataIntegrity(info.symbol.to_owned())),
            }
        }

        async fn price_coverage(
            &self,
            _class: Asset_Class,
            symbol: &str,
        ) -> Result<Date_Range, Error> {
            let prices = self.prices.lock().unwrap();
            let dates = prices
                .iter()
                .filter(|item| item.symbol == symbol)
                .map(|item| item.date);

            Ok(Date_Range {
                min: dates.clone().min(),
                max: dates.max(),
            })
        }

        async fn insert_prices(
            &self,
            _class: Asset_Class,
            data: &[Price_Record],
        ) -> Result<u64, Error> {
            self.prices.lock().unwrap().extend_from_slice(data);
            Ok(data.len() as u64)
        }
    }

    fn price(date: &str) -> Historical_Price {
        Historical_Price {
            date: date.to_owned(),
            open: 42000.5,
            high: 43000.0,
            low: 41000.25,
            close: 42500.0,
            adj_close: 42500.0,
            volume: 1200.0,
            unadjusted_volume: 1200.0,
            change: 499.5,
            change_percent: 1.19,
            vwap: 42166.9,
            label: String::from("January 01, 24"),
            change_over_time: 0.0119,
        }
    }

    const FIVE_DAYS: [&str; 5] = [
        "2024-01-05",
        "2024-01-01",
        "2024-01-03",
        "2024-01-02",
        "2024-01-04",
    ];

    #[tokio::test]
    async fn test_full_backfill_without_warehouse_rows() {
        let staging = MemoryStaging::default()
            .with_listing("ETHUSD", "2024-01-06")
            .with_prices("ETHUSD", &FIVE_DAYS);
        let warehouse = MemoryWarehouse::default();
        let sync = Synchronization::new(&staging, &warehouse);

        let result =
            sync.synchronize(Asset_Class::Crypto, "ETHUSD").await.unwrap();

        assert_eq!(result.mode, Sync_Mode::FullBackfill);
        assert!(result.asset_created);
        assert_eq!(result.inserted.len(), 5);
        assert_eq!(
            warehouse.dates("ETHUSD"),
            vec![
                "2024-01-01",
                "2024-01-02",
                "2024-01-03",
                "2024-01-04",
                "2024-01-05"
            ]
        );

        let prices = warehouse.prices.lock().unwrap();
        let as_of_date = parse_date("2024-01-06").unwrap();
        assert!(prices.iter().all(|item| item.as_of_date == as_of_date
            && item.asset_id == result.asset_id));
    }

    #[tokio::test]
    async fn test_incremental_delta_on_existing_asset() {
        let staging = MemoryStaging::default()
            .with_listing("BTCUSD", "2024-01-06")
            .with_prices("BTCUSD", &FIVE_DAYS);
        let warehouse = MemoryWarehouse::default();
        let existing = Asset_Info::from_listing(
            Asset_Class::Crypto,
            &staging.listings[0],
        )
        .unwrap();
        warehouse.seed_asset(7, existing);
        warehouse.seed_prices(
            7,
            "BTCUSD",
            &["2024-01-01", "2024-01-02", "2024-01-03"],
        );

        let sync = Synchronization::new(&staging, &warehouse);
        let result =
            sync.synchronize(Asset_Class::Crypto, "BTCUSD").await.unwrap();

        let after = parse_date("2024-01-03").unwrap();
        assert_eq!(result.mode, Sync_Mode::Incremental { after });
        assert_eq!(result.asset_id, 7);
        assert!(!result.asset_created);
        assert_eq!(
            result.inserted,
            vec![
                parse_date("2024-01-04").unwrap(),
                parse_date("2024-01-05").unwrap()
            ]
        );

        let prices = warehouse.prices.lock().unwrap();
        let new_rows: Vec<&Price_Record> =
            prices.iter().filter(|item| item.date > after).collect();
        assert_eq!(new_rows.len(), 2);
        assert!(new_rows.iter().all(|item| item.asset_id == 7));
    }

    #[tokio::test]
    async fn test_second_run_writes_nothing() {
        let staging = MemoryStaging::default()
            .with_listing("AAPL", "2024-01-06")
            .with_prices("AAPL", &FIVE_DAYS);
        let warehouse = MemoryWarehouse::default();
        let sync = Synchronization::new(&staging, &warehouse);

        let first = sync.synchronize(Asset_Class::Stock, "AAPL").await.unwrap();
        let second =
            sync.synchronize(Asset_Class::Stock, "AAPL").await.unwrap();

        assert_eq!(first.inserted.len(), 5);
        assert!(second.is_noop());
        assert_eq!(second.asset_id, first.asset_id);
        assert_eq!(warehouse.write_count(), (1, 5));
    }

    #[tokio::test]
    async fn test_resync_updates_asset_in_place() {
        let mut staging = MemoryStaging::default()
            .with_listing("AAPL", "2024-01-06")
            .with_prices("AAPL", &["2024-01-05"]);
        let warehouse = MemoryWarehouse::default();

        let first = Synchronization::new(&staging, &warehouse)
            .synchronize(Asset_Class::Stock, "AAPL")
            .await
            .unwrap();

        staging.listings[0].name = Some(String::from("Apple Inc."));
        staging.listings[0].date = String::from("2024-01-07");

        let second = Synchronization::new(&staging, &warehouse)
            .synchronize(Asset_Class::Stock, "AAPL")
            .await
            .unwrap();

        assert!(first.asset_created);
        assert!(!second.asset_created);
        assert_eq!(first.asset_id, second.asset_id);

        let assets = warehouse.assets.lock().unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].1.name.as_deref(), Some("Apple Inc."));
        assert_eq!(assets[0].1.r#type, "stock");
        assert_eq!(assets[0].1.as_of_date, parse_date("2024-01-07").unwrap());
    }

    #[tokio::test]
    async fn test_ambiguous_listing_writes_nothing() {
        let staging = MemoryStaging::default()
            .with_listing("TSLA", "2024-01-06")
            .with_listing("TSLA", "2024-01-06")
            .with_prices("TSLA", &FIVE_DAYS);
        let warehouse = MemoryWarehouse::default();
        let sync = Synchronization::new(&staging, &warehouse);

        let result = sync.synchronize(Asset_Class::Stock, "TSLA").await;

        assert!(matches!(result, Err(Error::AmbiguousRecord(_))));
        assert_eq!(warehouse.write_count(), (0, 0));
    }

    #[tokio::test]
    async fn test_unlisted_symbol_is_not_found() {
        let staging =
            MemoryStaging::default().with_prices("NVDA", &["2024-01-01"]);
        let warehouse = MemoryWarehouse::default();
        let sync = Synchronization::new(&staging, &warehouse);

        let result = sync.synchronize(Asset_Class::Stock, "NVDA").await;

        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(warehouse.write_count(), (0, 0));
    }

    #[tokio::test]
    async fn test_synchronize_all_continues_after_failure() {
        let staging = MemoryStaging::default()
            .with_listing("BTCUSD", "2024-01-06")
            .with_prices("BTCUSD", &FIVE_DAYS)
            .with_prices("DOGEUSD", &["2024-01-01"]);
        let warehouse = MemoryWarehouse::default();
        let sync = Synchronization::new(&staging, &warehouse);

        let (results, failures) =
            sync.synchronize_all(Asset_Class::Crypto).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "BTCUSD");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "DOGEUSD");
        assert!(matches!(failures[0].1, Error::NotFound(_)));
    }
}
