use anyhow::Context;
use async_trait::async_trait;
use tokio::fs;
use tracing::info;

use crate::{
    configuration::Config,
    dao::{get_path, ConnectOptions, PoolOption, PoolType},
    error::Error,
    helpers::Asset_Class,
    model::{Asset, Asset_Info, Asset_Upsert, Date_Range, Price_Record, Table},
    provider::Warehouse,
};

const SCHEMA_FILES: [&str; 3] = ["asset.sql", "stock.sql", "crypto.sql"];
const INSERT_CHUNK: usize = 1000;

#[derive(Debug)]
pub struct DatabasePool {
    pub asset: Table<Asset>,
    pub stock: Table<Price_Record>,
    pub crypto: Table<Price_Record>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let options = ConnectOptions::new()
            .host(&config.postgres_host)
            .port(config.postgres_port)
            .database(&config.postgres_database)
            .username(&config.postgres_user)
            .password(&config.postgres_password);

        let pool = PoolOption::new()
            .max_connections(config.postgres_max_connections)
            .connect_with(options)
            .await
            .map_err(|e| Error::Connection(format!("postgres: {}", e)))?;

        info!(
            "Connected to postgres {}:{}/{}",
            config.postgres_host, config.postgres_port, config.postgres_database
        );

        Ok(DatabasePool {
            asset: Table::new(pool.clone(), "asset"),
            stock: Table::new(pool.clone(), Asset_Class::Stock.table()),
            crypto: Table::new(pool.clone(), Asset_Class::Crypto.table()),
            pool,
        })
    }

    /// Creates the warehouse tables that are still missing.
    pub async fn init_schema(&self) -> Result<(), Error> {
        let dir = env!("CARGO_MANIFEST_DIR");

        for file in SCHEMA_FILES {
            let path = get_path(dir, file);
            let data = fs::read_to_string(&path)
                .await
                .with_context(|| format!("schema file {}", path.display()))?;
            sqlx::raw_sql(&data).execute(&self.pool).await?;
        }

        Ok(())
    }

    pub fn prices(&self, class: Asset_Class) -> &Table<Price_Record> {
        match class {
            Asset_Class::Stock => &self.stock,
            Asset_Class::Crypto => &self.crypto,
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Postgres pool closed");
    }
}

#[async_trait]
impl Warehouse for DatabasePool {
    async fn upsert_asset(
        &self,
        info: &Asset_Info,
    ) -> Result<Asset_Upsert, Error> {
        let mut tx = self.pool.begin().await?;
        let rows = self.asset.get_by_symbol(&info.symbol, &mut tx).await?;

        let upsert = match rows.as_slice() {
            [] => {
                let asset_id = self.asset.insert(info, &mut tx).await?;
                Asset_Upsert {
                    asset_id,
                    created: true,
                }
            },
            [asset] => {
                self.asset.update(asset.asset_id, info, &mut tx).await?;
                Asset_Upsert {
                    asset_id: asset.asset_id,
                    created: false,
                }
            },
            _ => {
                return Err(Error::DataIntegrity(format!(
                    "{} asset rows for symbol {}",
                    rows.len(),
                    info.symbol
                )));
            },
        };

        tx.commit().await?;

        Ok(upsert)
    }

    async fn price_coverage(
        &self,
        class: Asset_Class,
        symbol: &str,
    ) -> Result<Date_Range, Error> {
        Ok(self.prices(class).get_date_range(symbol).await?)
    }

    async fn insert_prices(
        &self,
        class: Asset_Class,
        data: &[Price_Record],
    ) -> Result<u64, Error> {
        let table = self.prices(class);
        let mut tx = self.pool.begin().await?;

        for chunk in data.chunks(INSERT_CHUNK) {
            table.insert_many(chunk, &mut tx).await?;
        }

        tx.commit().await?;

        Ok(data.len() as u64)
    }
}
