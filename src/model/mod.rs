mod models;
mod table;

pub use models::*;
pub use table::Table;
