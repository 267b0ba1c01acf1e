mod client;
mod client_config;
mod convert;
mod error;

pub use client::{MongoStore, TEXT_INDEX_NAME};
pub use client_config::{
    StoreConfig, StoreConfigBuilder, DEFAULT_CONNECTION_STRING, DEFAULT_CONVERSATION_COLLECTION,
    DEFAULT_DATABASE,
};
pub(crate) use client_config::parse_flag;
pub use convert::{
    bson_as_f64, bson_as_i64, bson_to_display_string, document_to_json, json_to_document,
    str_field_or,
};
pub use error::StoreError;
