pub use self::{
    database::DatabasePool,
    document_store::DocumentStore,
    http::HTTP,
    synchronization::{Staging, Synchronization, Warehouse},
};

mod database;
mod document_store;
mod http;
mod synchronization;
