mod postgre;

pub use postgre::{
    get_path, ConnectOptions, DataBase, PoolOption, PoolType, QueryResult,
};
