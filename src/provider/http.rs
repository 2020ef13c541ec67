use std::time::Duration;

use reqwest::{Client, Request, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::{
    configuration::Config,
    error::Error,
    helpers::List_Kind,
    types::{Historical_Price, Historical_Price_Body},
};

#[derive(Debug)]
pub struct HTTP {
    config: Config,
    pub http: Client,
}

impl HTTP {
    pub fn new(config: Config) -> Result<HTTP, Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(HTTP { config, http })
    }

    /// GET `url` with `params` and the api key appended. Anything but a 200
    /// is reported with the endpoint and status. Transport errors are stripped
    /// of the request url since it carries the key.
    pub async fn fetch(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, Error> {
        debug!("GET {}", url);

        let request = self.request(url, params)?;
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| Error::ReqwestError(e.without_url()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::UnexpectedResponse {
                endpoint: url.to_owned(),
                status,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::ReqwestError(e.without_url()))
    }

    fn request(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<Request, Error> {
        self.http
            .get(url)
            .query(params)
            .query(&[("apikey", self.config.fmp_api_key.as_str())])
            .build()
            .map_err(|e| Error::ReqwestError(e.without_url()))
    }

    pub async fn get_list(&self, kind: List_Kind) -> Result<Vec<Value>, Error> {
        let url = self.config.get_list_url(kind);
        let json = self.fetch(&url, &[]).await?;
        expect_array(&url, json)
    }

    pub async fn search_company(&self, query: &str) -> Result<Vec<Value>, Error> {
        let url = self.config.get_search_url();
        let json = self.fetch(&url, &[("query", query)]).await?;
        expect_array(&url, json)
    }

    pub async fn get_historical_prices(
        &self,
        symbol: &str,
    ) -> Result<Vec<Historical_Price>, Error> {
        let url = self.config.get_historical_price_url(symbol);
        let json = self.fetch(&url, &[]).await?;
        parse_historical(symbol, json)
    }
}

fn expect_array(url: &str, json: Value) -> Result<Vec<Value>, Error> {
    match json {
        Value::Array(items) => Ok(items),
        other => Err(Error::Validation(format!(
            "{} returned {} instead of a list",
            url,
            kind_of(&other)
        ))),
    }
}

fn parse_historical(
    symbol: &str,
    json: Value,
) -> Result<Vec<Historical_Price>, Error> {
    let body: Historical_Price_Body = serde_json::from_value(json)?;

    body.historical.ok_or_else(|| {
        Error::Validation(format!(
            "price history of {} has no 'historical' field",
            symbol
        ))
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
