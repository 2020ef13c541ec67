use std::{
    env, fmt, fs, io::ErrorKind, ops::Deref, sync::Arc, time::Duration,
};

use url::Url;

use crate::{
    error::Error,
    helpers::{Asset_Class, List_Kind},
    provider::{DatabasePool, DocumentStore, HTTP},
};

const DEFAULT_FMP_API_URL: &str = "https://financialmodelingprep.com/api/v3";
const DEFAULT_STOCK_SYMBOLS: &str = "AAPL,NVDA,TSLA";
const DEFAULT_CRYPTO_SYMBOLS: &str = "BTCUSD,ETHUSD,USDTUSD";
const MAX_SCHEDULE_HOURS: u64 = 366 * 24;

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

/// Handles owned by one run. Opened by [`State::new`], released by
/// [`State::close`].
#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub documents: DocumentStore,
    pub database: DatabasePool,
    pub http: HTTP,
}

impl State {
    pub async fn new(config: Config) -> Result<State, Error> {
        let documents = DocumentStore::new(&config).await?;
        let database = DatabasePool::new(&config).await?;
        database.init_schema().await?;
        let http = HTTP::new(config.clone())?;

        Ok(Self {
            config,
            documents,
            database,
            http,
        })
    }

    pub async fn close(&self) {
        self.database.close().await;
        self.documents.close().await;
    }
}

#[derive(Clone)]
pub struct Config {
    pub mongo_server_url: String,
    pub max_pool_size: u32,
    pub postgres_host: String,
    pub postgres_port: u16,
    pub postgres_database: String,
    pub postgres_user: String,
    pub postgres_password: String,
    pub postgres_max_connections: u32,
    pub fmp_api_key: String,
    pub fmp_api_url: String,
    pub timeout: u64,
    pub stock_symbols: Vec<String>,
    pub crypto_symbols: Vec<String>,
    pub company_search_query: String,
    pub schedule_interval: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("mongo_server_url", &"***")
            .field("max_pool_size", &self.max_pool_size)
            .field("postgres_host", &self.postgres_host)
            .field("postgres_port", &self.postgres_port)
            .field("postgres_database", &self.postgres_database)
            .field("postgres_user", &self.postgres_user)
            .field("postgres_password", &"***")
            .field("postgres_max_connections", &self.postgres_max_connections)
            .field("fmp_api_key", &"***")
            .field("fmp_api_url", &self.fmp_api_url)
            .field("timeout", &self.timeout)
            .field("stock_symbols", &self.stock_symbols)
            .field("crypto_symbols", &self.crypto_symbols)
            .field("company_search_query", &self.company_search_query)
            .field("schedule_interval", &self.schedule_interval)
            .finish()
    }
}

impl Config {
    pub fn get_list_url(&self, kind: List_Kind) -> String {
        self.endpoint(kind.endpoint())
    }

    pub fn get_search_url(&self) -> String {
        self.endpoint("search")
    }

    pub fn get_historical_price_url(&self, symbol: &str) -> String {
        self.endpoint(&format!("historical-price-full/{}", symbol))
    }

    pub fn symbols(&self, class: Asset_Class) -> &[String] {
        match class {
            Asset_Class::Stock => &self.stock_symbols,
            Asset_Class::Crypto => &self.crypto_symbols,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.fmp_api_url.trim_end_matches('/'), path)
    }
}

pub fn get_configuration() -> Result<Config, Error> {
    let mongo_server_url = env::var("MONGO_SERVER_URL")?;
    let max_pool_size = env::var("MAX_POOL_SIZE")?.parse()?;
    let postgres_host = env::var("POSTGRES_HOST")?;
    let postgres_port = env::var("POSTGRES_PORT")?.parse()?;
    let postgres_database = env::var("POSTGRES_DATABASE")?;
    let postgres_user = env::var("POSTGRES_USER")?;
    let postgres_password = env::var("POSTGRES_PASSWORD")?;
    let fmp_api_key = env::var("FMP_API_KEY")?;

    let postgres_max_connections =
        var_or("POSTGRES_MAX_CONNECTIONS", "5").parse()?;
    let fmp_api_url = var_or("FMP_API_URL", DEFAULT_FMP_API_URL);
    Url::parse(&fmp_api_url)?;
    let timeout = var_or("TIMEOUT", "30").parse()?;
    let stock_symbols =
        parse_symbols(&var_or("STOCK_SYMBOLS", DEFAULT_STOCK_SYMBOLS));
    let crypto_symbols =
        parse_symbols(&var_or("CRYPTO_SYMBOLS", DEFAULT_CRYPTO_SYMBOLS));
    let company_search_query = var_or("COMPANY_SEARCH_QUERY", "AA");
    let schedule_interval: u64 =
        var_or("SCHEDULE_INTERVAL_IN_HOURS", "24").parse()?;

    schedule_period(schedule_interval)?;

    let config = Config {
        mongo_server_url,
        max_pool_size,
        postgres_host,
        postgres_port,
        postgres_database,
        postgres_user,
        postgres_password,
        postgres_max_connections,
        fmp_api_key,
        fmp_api_url,
        timeout,
        stock_symbols,
        crypto_symbols,
        company_search_query,
        schedule_interval,
    };

    Ok(config)
}

/// Loads `.env` from the crate directory into the process environment.
/// Variables already exported by the caller win over the file.
pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    let config_string = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::Io(e)),
    };

    for (key, value) in parse_config_string(&config_string) {
        if env::var_os(&key).is_none() {
            env::set_var(key, value);
        }
    }

    Ok(())
}

fn parse_config_string(config: &str) -> Vec<(String, String)> {
    config
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim().trim_matches('"');
            (key.trim().to_owned(), value.to_owned())
        })
        .collect()
}

/// Interval between scheduled runs, at least one hour and at most a year.
pub fn schedule_period(hours: u64) -> Result<Duration, Error> {
    match hours.checked_mul(60 * 60) {
        Some(seconds) if hours > 0 && hours <= MAX_SCHEDULE_HOURS => {
            Ok(Duration::from_secs(seconds))
        },
        _ => Err(Error::ConfigurationError(format!(
            "SCHEDULE_INTERVAL_IN_HOURS must be between 1 and {}, got {}",
            MAX_SCHEDULE_HOURS, hours
        ))),
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Splits a comma separated list, uppercasing and dropping duplicates while
/// keeping the first occurrence order.
pub fn parse_symbols(value: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();

    for symbol in value.split(',').map(|item| item.trim().to_uppercase()) {
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }

    symbols
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            mongo_server_url: String::from("mongodb://localhost:27017"),
            max_pool_size: 10,
            postgres_host: String::from("localhost"),
            postgres_port: 5432,
            postgres_database: String::from("warehouse"),
            postgres_user: String::from("etl"),
            postgres_password: String::from("secret"),
            postgres_max_connections: 5,
            fmp_api_key: String::from("key"),
            fmp_api_url: String::from(
                "https://financialmodelingprep.com/api/v3/",
            ),
            timeout: 30,
            stock_symbols: vec![String::from("AAPL")],
            crypto_symbols: vec![String::from("BTCUSD")],
            company_search_query: String::from("AA"),
            schedule_interval: 24,
        }
    }

    #[test]
    fn test_parse_config_string() {
        let data = "\
# credentials
MONGO_SERVER_URL=mongodb://user:pw@localhost:27017/?authSource=admin

FMP_API_KEY=\"abc=123\"
BROKEN_LINE
";
        let params = parse_config_string(data);
        assert_eq!(
            params,
            vec![
                (
                    String::from("MONGO_SERVER_URL"),
                    String::from(
                        "mongodb://user:pw@localhost:27017/?authSource=admin"
                    )
                ),
                (String::from("FMP_API_KEY"), String::from("abc=123")),
            ]
        );
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!(
            parse_symbols(" btcusd,ETHUSD,,BTCUSD , usdtusd"),
            vec!["BTCUSD", "ETHUSD", "USDTUSD"]
        );
        assert!(parse_symbols("").is_empty());
    }

    #[test]
    fn test_schedule_period() {
        assert_eq!(schedule_period(24).unwrap(), Duration::from_secs(86_400));
        assert!(matches!(
            schedule_period(0),
            Err(Error::ConfigurationError(_))
        ));
        assert!(matches!(
            schedule_period(u64::MAX / 1000),
            Err(Error::ConfigurationError(_))
        ));
        assert!(matches!(
            schedule_period(u64::MAX),
            Err(Error::ConfigurationError(_))
        ));
        assert!(schedule_period(MAX_SCHEDULE_HOURS).is_ok());
        assert!(schedule_period(MAX_SCHEDULE_HOURS + 1).is_err());
    }

    #[test]
    fn test_endpoint_urls() {
        let config = config();
        assert_eq!(
            config.get_historical_price_url("BTCUSD"),
            "https://financialmodelingprep.com/api/v3/historical-price-full/BTCUSD"
        );
        assert_eq!(
            config.get_list_url(List_Kind::Crypto),
            "https://financialmodelingprep.com/api/v3/symbol/available-cryptocurrencies"
        );
        assert_eq!(
            config.get_search_url(),
            "https://financialmodelingprep.com/api/v3/search"
        );
    }

    #[test]
    fn test_debug_hides_credentials() {
        let output = format!("{:?}", config());
        assert!(!output.contains("secret"));
        assert!(!output.contains("27017"));
        assert!(output.contains("warehouse"));
    }
}
