use std::marker::PhantomData;

use crate::dao::PoolType;

/// Typed handle on one warehouse table.
#[derive(Debug)]
pub struct Table<T> {
    pub pool: PoolType,
    pub name: &'static str,
    _phantomdata: PhantomData<T>,
}

impl<T> Table<T> {
    pub fn new(pool: PoolType, name: &'static str) -> Self {
        Table {
            pool,
            name,
            _phantomdata: PhantomData,
        }
    }
}
