pub use self::{
    historical_price::{Historical_Price, Historical_Price_Body},
    listing::Listing,
    staged_price::Staged_Price,
};

mod historical_price;
mod listing;
mod staged_price;
