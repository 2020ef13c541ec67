use mongodb::bson::{self, Document};
use serde_json::Value;

use crate::error::Error;

/// Converts fetched JSON objects into documents ready for insertion.
pub fn to_documents(data: Vec<Value>) -> Result<Vec<Document>, Error> {
    data.iter()
        .map(|item| Ok(bson::to_document(item)?))
        .collect()
}
