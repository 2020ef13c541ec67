use std::{fmt, io, str::FromStr};

pub const GENERAL_INFO_DATABASE: &str = "ingestion-general_info";
pub const COMPANY_GENERAL_INFO_COLLECTION: &str = "company_general_info";

/// Asset namespace a symbol belongs to. Each class owns one staging database,
/// one canonical list and one warehouse price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset_Class {
    Stock,
    Crypto,
}

impl Asset_Class {
    pub fn as_str(&self) -> &'static str {
        match self {
            Asset_Class::Stock => "stock",
            Asset_Class::Crypto => "crypto",
        }
    }

    pub fn price_database(&self) -> &'static str {
        match self {
            Asset_Class::Stock => "ingestion-stock_price",
            Asset_Class::Crypto => "ingestion-crypto_price",
        }
    }

    pub fn list_kind(&self) -> List_Kind {
        match self {
            Asset_Class::Stock => List_Kind::Stock,
            Asset_Class::Crypto => List_Kind::Crypto,
        }
    }

    /// Attribute every staged price row is tagged with.
    pub fn symbol_field(&self) -> &'static str {
        match self {
            Asset_Class::Stock => "stock_symbol",
            Asset_Class::Crypto => "crypto_symbol",
        }
    }

    /// Warehouse price table, also used as the `asset.type` fallback.
    pub fn table(&self) -> &'static str {
        self.as_str()
    }

    /// Staging collection of a symbol.
    pub fn collection(&self, symbol: &str) -> String {
        symbol.to_uppercase()
    }
}

impl fmt::Display for Asset_Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Asset_Class {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<Asset_Class, Self::Err> {
        match value {
            "stock" => Ok(Asset_Class::Stock),
            "crypto" => Ok(Asset_Class::Crypto),
            _ => Err(io::Error::other("Asset class not supported")),
        }
    }
}

/// Canonical symbol lists published by the price API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum List_Kind {
    Stock,
    Crypto,
    Etf,
}

impl List_Kind {
    pub fn collection(&self) -> &'static str {
        match self {
            List_Kind::Stock => "stock_list",
            List_Kind::Crypto => "crypto_list",
            List_Kind::Etf => "etf_list",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            List_Kind::Stock => "stock/list",
            List_Kind::Crypto => "symbol/available-cryptocurrencies",
            List_Kind::Etf => "etf/list",
        }
    }
}

impl fmt::Display for List_Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            List_Kind::Stock => write!(f, "stock"),
            List_Kind::Crypto => write!(f, "crypto"),
            List_Kind::Etf => write!(f, "etf"),
        }
    }
}

impl FromStr for List_Kind {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<List_Kind, Self::Err> {
        match value {
            "stock" => Ok(List_Kind::Stock),
            "crypto" => Ok(List_Kind::Crypto),
            "etf" => Ok(List_Kind::Etf),
            _ => Err(io::Error::other("List kind not supported")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison_Operator {
    Equal,
    Greater,
    Less,
}

impl Comparison_Operator {
    pub fn as_mongo(&self) -> &'static str {
        match self {
            Comparison_Operator::Equal => "$eq",
            Comparison_Operator::Greater => "$gt",
            Comparison_Operator::Less => "$lt",
        }
    }
}

impl fmt::Display for Comparison_Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Comparison_Operator::Equal => write!(f, "="),
            Comparison_Operator::Greater => write!(f, ">"),
            Comparison_Operator::Less => write!(f, "<"),
        }
    }
}

impl FromStr for Comparison_Operator {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<Comparison_Operator, Self::Err> {
        match value {
            "=" => Ok(Comparison_Operator::Equal),
            ">" => Ok(Comparison_Operator::Greater),
            "<" => Ok(Comparison_Operator::Less),
            _ => Err(io::Error::other("Comparison operator not supported")),
        }
    }
}
