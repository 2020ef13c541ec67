use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use mongodb::bson::{doc, Document};
use serde_json::Value;

use crate::{error::Error, helpers::Comparison_Operator};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Anything carrying an ISO `YYYY-MM-DD` date attribute.
pub trait Dated {
    fn date(&self) -> &str;
}

pub fn today() -> String {
    format_date(Utc::now().date_naive())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Result<NaiveDate, Error> {
    Ok(NaiveDate::parse_from_str(value, DATE_FORMAT)?)
}

/// Builds a single-field comparison query, e.g. `{"date": {"$gt": "2024-01-03"}}`.
pub fn filter_by_date(
    key: &str,
    threshold: &str,
    operator: &str,
) -> Result<Document, Error> {
    let operator =
        Comparison_Operator::from_str(operator).map_err(|_| {
            Error::InvalidOption {
                option: format!(
                    "operator '{}'. Valid options: =, >, <",
                    operator
                ),
            }
        })?;

    let comparison = operator.as_mongo();

    Ok(doc! { key: { comparison: threshold } })
}

/// Keeps the rows dated strictly after `max_date`.
pub fn rows_after<T: Dated>(rows: Vec<T>, max_date: &str) -> Vec<T> {
    rows.into_iter()
        .filter(|item| item.date() > max_date)
        .collect()
}

pub fn find_min_max_dates<T: Dated>(
    rows: &[T],
    date_key: &str,
) -> Result<(String, String), Error> {
    let min = rows.iter().map(|item| item.date()).min();
    let max = rows.iter().map(|item| item.date()).max();

    match (min, max) {
        (Some(min), Some(max)) => Ok((min.to_owned(), max.to_owned())),
        _ => Err(Error::Validation(format!(
            "No '{}' found in the list",
            date_key
        ))),
    }
}

/// Stamps every object with `date` set to `date`, replacing any previous value.
pub fn add_date_to_data(
    data: Vec<Value>,
    date: &str,
) -> Result<Vec<Value>, Error> {
    data.into_iter()
        .map(|mut item| match item.as_object_mut() {
            Some(object) => {
                object.insert(
                    String::from("date"),
                    Value::String(date.to_owned()),
                );
                Ok(item)
            },
            None => Err(Error::Validation(format!(
                "expected an object, got {}",
                item
            ))),
        })
        .collect()
}
