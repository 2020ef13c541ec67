pub use self::{
    dates::{
        add_date_to_data, filter_by_date, find_min_max_dates, format_date,
        parse_date, rows_after, today, Dated, DATE_FORMAT,
    },
    documents::to_documents,
    enums::{
        Asset_Class, Comparison_Operator, List_Kind,
        COMPANY_GENERAL_INFO_COLLECTION, GENERAL_INFO_DATABASE,
    },
};

mod dates;
mod documents;
mod enums;
