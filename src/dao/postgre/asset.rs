use sqlx::{Error, Transaction};

use super::{DataBase, QueryResult};
use crate::model::{Asset, Asset_Info, Table};

impl Table<Asset> {
    /// Locks the matching rows until the surrounding transaction ends.
    pub async fn get_by_symbol(
        &self,
        symbol: &str,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<Vec<Asset>, Error> {
        const SQL: &str = r#"
        SELECT
            "asset_id",
            "symbol",
            "name",
            "exchange",
            "exchange_short_name",
            "type",
            "as_of_date"
        FROM "asset"
        WHERE "symbol" = $1
        FOR UPDATE
        "#;

        sqlx::query_as(SQL)
            .bind(symbol)
            .fetch_all(&mut **transaction)
            .await
    }

    pub async fn insert(
        &self,
        data: &Asset_Info,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<i64, Error> {
        const SQL: &str = r#"
        INSERT INTO "asset" (
            "symbol",
            "name",
            "exchange",
            "exchange_short_name",
            "type",
            "as_of_date"
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING "asset_id"
        "#;

        let (asset_id,): (i64,) = sqlx::query_as(SQL)
            .bind(&data.symbol)
            .bind(&data.name)
            .bind(&data.exchange)
            .bind(&data.exchange_short_name)
            .bind(&data.r#type)
            .bind(data.as_of_date)
            .fetch_one(&mut **transaction)
            .await?;

        Ok(asset_id)
    }

    pub async fn update(
        &self,
        asset_id: i64,
        data: &Asset_Info,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<QueryResult, Error> {
        const SQL: &str = r#"
        UPDATE "asset"
        SET
            "name" = $1,
            "exchange" = $2,
            "exchange_short_name" = $3,
            "type" = $4,
            "as_of_date" = $5
        WHERE "asset_id" = $6
        "#;

        sqlx::query(SQL)
            .bind(&data.name)
            .bind(&data.exchange)
            .bind(&data.exchange_short_name)
            .bind(&data.r#type)
            .bind(data.as_of_date)
            .bind(asset_id)
            .execute(&mut **transaction)
            .await
    }
}
