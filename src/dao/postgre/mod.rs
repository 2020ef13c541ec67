pub use self::{
    path::get_path,
    types::{ConnectOptions, DataBase, PoolOption, PoolType, QueryResult},
};

mod asset;
mod path;
mod price;
mod types;
