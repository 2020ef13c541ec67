use mongodb::bson::{self, Document};

use crate::{
    error::Error,
    helpers::{Asset_Class, Dated},
    types::Historical_Price,
};

/// A price row read back from a staging collection together with the symbol
/// tag it was written with.
#[derive(Debug, Clone, PartialEq)]
pub struct Staged_Price {
    pub symbol: String,
    pub price: Historical_Price,
}

impl Staged_Price {
    pub fn new(symbol: &str, price: Historical_Price) -> Self {
        Staged_Price {
            symbol: symbol.to_owned(),
            price,
        }
    }

    pub fn from_document(
        class: Asset_Class,
        document: Document,
    ) -> Result<Self, Error> {
        let symbol = document.get_str(class.symbol_field())?.to_owned();
        let price: Historical_Price = bson::from_document(document)
            .map_err(|e| {
                Error::Validation(format!("staged {} row: {}", symbol, e))
            })?;

        Ok(Staged_Price { symbol, price })
    }

    pub fn to_document(&self, class: Asset_Class) -> Result<Document, Error> {
        let mut document = bson::to_document(&self.price)?;
        document.insert(class.symbol_field(), self.symbol.as_str());
        Ok(document)
    }
}

impl Dated for Staged_Price {
    fn date(&self) -> &str {
        &self.price.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    fn price(date: &str) -> Historical_Price {
        Historical_Price {
            date: date.to_owned(),
            open: 42000.5,
            high: 43000.0,
            low: 41000.25,
            close: 42500.0,
            adj_close: 42500.0,
            volume: 1250.75,
            unadjusted_volume: 1250.75,
            change: 499.5,
            change_percent: 1.19,
            vwap: 42166.9,
            label: String::from("January 04, 24"),
            change_over_time: 0.0119,
        }
    }

    #[test]
    fn test_document_is_tagged_with_class_field() {
        let staged = Staged_Price::new("BTCUSD", price("2024-01-04"));
        let document = staged.to_document(Asset_Class::Crypto).unwrap();

        assert_eq!(document.get_str("crypto_symbol").unwrap(), "BTCUSD");
        assert_eq!(document.get_str("date").unwrap(), "2024-01-04");
        assert_eq!(document.get_f64("adjClose").unwrap(), 42500.0);

        let read = Staged_Price::from_document(Asset_Class::Crypto, document)
            .unwrap();
        assert_eq!(read, staged);
    }

    #[test]
    fn test_integer_volumes_are_accepted() {
        let document = doc! {
            "_id": "65f0c0ffee",
            "stock_symbol": "AAPL",
            "date": "2024-03-08",
            "open": 169.0,
            "high": 173.7,
            "low": 168.94,
            "close": 170.73,
            "adjClose": 170.73,
            "volume": 76114600_i64,
            "unadjustedVolume": 76114600_i32,
            "change": 1.73,
            "changePercent": 1.02,
            "vwap": 171.12,
            "label": "March 08, 24",
            "changeOverTime": 0.0102,
        };

        let staged =
            Staged_Price::from_document(Asset_Class::Stock, document).unwrap();
        assert_eq!(staged.symbol, "AAPL");
        assert_eq!(staged.price.volume, 76114600.0);
    }

    #[test]
    fn test_missing_field_is_validation_error() {
        let missing_tag = doc! { "date": "2024-03-08" };
        assert!(matches!(
            Staged_Price::from_document(Asset_Class::Stock, missing_tag),
            Err(Error::Validation(_))
        ));

        let missing_close = doc! {
            "stock_symbol": "AAPL",
            "date": "2024-03-08",
        };
        assert!(matches!(
            Staged_Price::from_document(Asset_Class::Stock, missing_close),
            Err(Error::Validation(_))
        ));
    }
}
