use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::ClientOptions,
    Client, Collection,
};
use tracing::{info, warn};

use crate::{
    configuration::Config,
    error::Error,
    helpers::{filter_by_date, format_date, Asset_Class, GENERAL_INFO_DATABASE},
    provider::Staging,
    types::{Listing, Staged_Price},
};

const SCRATCH_SUFFIX: &str = "__replace";

/// Staging area client. Every read goes through the existence gate first, so
/// a missing database or collection surfaces as a typed error instead of an
/// empty result.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    client: Client,
}

impl DocumentStore {
    pub async fn new(config: &Config) -> Result<DocumentStore, Error> {
        let mut options = ClientOptions::parse(&config.mongo_server_url)
            .await
            .map_err(|e| Error::Connection(format!("mongodb: {}", e)))?;
        options.max_pool_size = Some(config.max_pool_size);
        options.app_name = Some(String::from("asset-flow"));

        let client = Client::with_options(options)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| Error::Connection(format!("mongodb: {}", e)))?;

        info!("Connected to mongodb");

        Ok(DocumentStore { client })
    }

    pub async fn close(&self) {
        self.client.clone().shutdown().await;
        info!("Mongodb client closed");
    }

    pub async fn database_exists(&self, database: &str) -> Result<bool, Error> {
        let names = self.client.list_database_names().await?;
        Ok(names.iter().any(|name| name == database))
    }

    pub async fn collection_exists(
        &self,
        database: &str,
        collection: &str,
    ) -> Result<bool, Error> {
        if !self.database_exists(database).await? {
            return Ok(false);
        }

        let names = self.client.database(database).list_collection_names().await?;
        Ok(names.iter().any(|name| name == collection))
    }

    pub async fn ensure_database(&self, database: &str) -> Result<(), Error> {
        let names = self.client.list_database_names().await?;
        check_database(&names, database)
    }

    pub async fn ensure_collection(
        &self,
        database: &str,
        collection: &str,
    ) -> Result<(), Error> {
        self.ensure_database(database).await?;

        let names = self.client.database(database).list_collection_names().await?;
        check_collection(&names, database, collection)
    }

    pub async fn list_collections(
        &self,
        database: &str,
    ) -> Result<Vec<String>, Error> {
        self.ensure_database(database).await?;

        let mut names =
            self.client.database(database).list_collection_names().await?;
        names.sort();

        Ok(names)
    }

    pub async fn load_all(
        &self,
        database: &str,
        collection: &str,
    ) -> Result<Vec<Document>, Error> {
        self.find(database, collection, doc! {}).await
    }

    pub async fn find(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<Document>, Error> {
        self.ensure_collection(database, collection).await?;

        let cursor = self.collection(database, collection).find(filter).await?;
        let data = cursor.try_collect::<Vec<Document>>().await?;

        Ok(data)
    }

    pub async fn find_by_key_value(
        &self,
        database: &str,
        collection: &str,
        key: &str,
        value: &str,
    ) -> Result<Vec<Document>, Error> {
        self.find(database, collection, doc! { key: value }).await
    }

    /// Documents whose `key` compares to `threshold` with one of `=`, `>`, `<`.
    pub async fn filter_by_date(
        &self,
        database: &str,
        collection: &str,
        key: &str,
        threshold: &str,
        operator: &str,
    ) -> Result<Vec<Document>, Error> {
        let filter = filter_by_date(key, threshold, operator)?;
        self.find(database, collection, filter).await
    }

    /// Smallest and greatest value of the string field `key`, `None` when the
    /// collection is empty.
    pub async fn min_max_dates(
        &self,
        database: &str,
        collection: &str,
        key: &str,
    ) -> Result<Option<(String, String)>, Error> {
        self.ensure_collection(database, collection).await?;

        let handle = self.collection(database, collection);
        let filter = doc! { key: { "$exists": true } };

        let min = handle
            .find_one(filter.clone())
            .sort(doc! { key: 1 })
            .await?;
        let max = handle.find_one(filter).sort(doc! { key: -1 }).await?;

        match (min, max) {
            (Some(min), Some(max)) => Ok(Some((
                min.get_str(key)?.to_owned(),
                max.get_str(key)?.to_owned(),
            ))),
            _ => Ok(None),
        }
    }

    pub async fn distinct(
        &self,
        database: &str,
        collection: &str,
        key: &str,
    ) -> Result<Vec<Bson>, Error> {
        self.ensure_collection(database, collection).await?;

        let values = self
            .collection(database, collection)
            .distinct(key, doc! {})
            .await?;

        Ok(values)
    }

    /// Creates the collection on first write. Empty input is a no-op.
    pub async fn insert_many(
        &self,
        database: &str,
        collection: &str,
        data: Vec<Document>,
    ) -> Result<usize, Error> {
        if data.is_empty() {
            return Ok(0);
        }

        let result = self
            .collection(database, collection)
            .insert_many(data)
            .await?;

        Ok(result.inserted_ids.len())
    }

    /// Writes `data` to a scratch collection and renames it over
    /// `collection`, so a failed write leaves the previous content in place.
    pub async fn replace_collection(
        &self,
        database: &str,
        collection: &str,
        data: Vec<Document>,
    ) -> Result<usize, Error> {
        if data.is_empty() {
            self.drop_collection(database, collection).await?;
            return Ok(0);
        }

        let scratch = format!("{}{}", collection, SCRATCH_SUFFIX);
        self.drop_collection(database, &scratch).await?;

        let count = match self.insert_many(database, &scratch, data).await {
            Ok(count) => count,
            Err(e) => {
                warn!(
                    "{}/{}: write failed, previous content kept",
                    database, collection
                );
                if let Err(e) = self.drop_collection(database, &scratch).await
                {
                    warn!("{}/{}: {}", database, scratch, e);
                }
                return Err(e);
            },
        };

        self.client
            .database("admin")
            .run_command(rename_command(database, &scratch, collection))
            .await?;

        Ok(count)
    }

    pub async fn drop_collection(
        &self,
        database: &str,
        collection: &str,
    ) -> Result<(), Error> {
        self.collection(database, collection).drop().await?;
        Ok(())
    }

    fn collection(
        &self,
        database: &str,
        collection: &str,
    ) -> Collection<Document> {
        self.client.database(database).collection(collection)
    }
}

#[async_trait]
impl Staging for DocumentStore {
    async fn find_listings(
        &self,
        class: Asset_Class,
        symbol: &str,
    ) -> Result<Vec<Listing>, Error> {
        let collection = class.list_kind().collection();
        let data = self
            .find_by_key_value(GENERAL_INFO_DATABASE, collection, "symbol", symbol)
            .await?;

        data.into_iter()
            .map(|item| {
                mongodb::bson::from_document::<Listing>(item).map_err(|e| {
                    Error::Validation(format!(
                        "{} entry for {}: {}",
                        collection, symbol, e
                    ))
                })
            })
            .collect()
    }

    async fn staged_prices(
        &self,
        class: Asset_Class,
        symbol: &str,
        after: Option<NaiveDate>,
    ) -> Result<Vec<Staged_Price>, Error> {
        let database = class.price_database();
        let collection = class.collection(symbol);

        let data = match after {
            Some(after) => {
                self.filter_by_date(
                    database,
                    &collection,
                    "date",
                    &format_date(after),
                    ">",
                )
                .await?
            },
            None => self.load_all(database, &collection).await?,
        };

        data.into_iter()
            .map(|item| Staged_Price::from_document(class, item))
            .collect()
    }

    async fn staged_symbols(
        &self,
        class: Asset_Class,
    ) -> Result<Vec<String>, Error> {
        let database = class.price_database();
        let mut symbols = vec![];

        for collection in self.list_collections(database).await? {
            let values =
                self.distinct(database, &collection, class.symbol_field()).await?;

            let tags: Vec<&str> =
                values.iter().filter_map(Bson::as_str).collect();

            match tags.as_slice() {
                [] => {
                    warn!("{}/{}: no tagged rows, skipped", database, collection);
                },
                [symbol] => symbols.push((*symbol).to_owned()),
                _ => {
                    return Err(Error::AmbiguousRecord(format!(
                        "{}/{} holds {} symbols",
                        database,
                        collection,
                        tags.len()
                    )));
                },
            }
        }

        Ok(symbols)
    }
}

fn check_database(names: &[String], database: &str) -> Result<(), Error> {
    if names.iter().any(|name| name == database) {
        return Ok(());
    }

    Err(Error::MissingDatabase {
        database: database.to_owned(),
    })
}

fn check_collection(
    names: &[String],
    database: &str,
    collection: &str,
) -> Result<(), Error> {
    if names.iter().any(|name| name == collection) {
        return Ok(());
    }

    Err(Error::MissingCollection {
        database: database.to_owned(),
        collection: collection.to_owned(),
    })
}

fn rename_command(database: &str, from: &str, to: &str) -> Document {
    doc! {
        "renameCollection": format!("{}.{}", database, from),
        "to": format!("{}.{}", database, to),
        "dropTarget": true,
    }
}
