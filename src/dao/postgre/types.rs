use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgQueryResult},
    PgPool, Postgres,
};

pub type PoolType = PgPool;
pub type PoolOption = PgPoolOptions;
pub type ConnectOptions = PgConnectOptions;
pub type QueryResult = PgQueryResult;
pub type DataBase = Postgres;
