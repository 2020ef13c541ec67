pub mod company_info;
pub mod daily_prices;
pub mod pipeline;
pub mod standardize;
pub mod store_list;
