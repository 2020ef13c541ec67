use sqlx::{Error, QueryBuilder, Transaction};

use super::DataBase;
use crate::model::{Date_Range, Price_Record, Table};

impl Table<Price_Record> {
    pub async fn get_date_range(
        &self,
        symbol: &str,
    ) -> Result<Date_Range, Error> {
        let sql = format!(
            r#"
            SELECT MIN("date") AS "min", MAX("date") AS "max"
            FROM "{}"
            WHERE "symbol" = $1
            "#,
            self.name
        );

        sqlx::query_as(&sql)
            .bind(symbol)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn insert_many(
        &self,
        data: &[Price_Record],
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<(), Error> {
        if data.is_empty() {
            return Ok(());
        }

        let mut query_builder: QueryBuilder<DataBase> = QueryBuilder::new(
            format!(
                r#"
                INSERT INTO "{}" (
                    "asset_id",
                    "symbol",
                    "date",
                    "open",
                    "high",
                    "low",
                    "close",
                    "adj_close",
                    "volume",
                    "unadjusted_volume",
                    "change",
                    "change_percent",
                    "vwap",
                    "label",
                    "change_over_time",
                    "as_of_date"
                )"#,
                self.name
            ),
        );

        query_builder.push_values(data, |mut b, price| {
            b.push_bind(price.asset_id)
                .push_bind(&price.symbol)
                .push_bind(price.date)
                .push_bind(&price.open)
                .push_bind(&price.high)
                .push_bind(&price.low)
                .push_bind(&price.close)
                .push_bind(&price.adj_close)
                .push_bind(&price.volume)
                .push_bind(&price.unadjusted_volume)
                .push_bind(&price.change)
                .push_bind(&price.change_percent)
                .push_bind(&price.vwap)
                .push_bind(&price.label)
                .push_bind(&price.change_over_time)
                .push_bind(price.as_of_date);
        });

        let query = query_builder.build();
        query.execute(&mut **transaction).await?;

        Ok(())
    }
}
