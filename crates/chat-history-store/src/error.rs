use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[cfg(feature = "mongodb")]
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[cfg(feature = "mongodb")]
    #[error("BSON serialization error: {0}")]
    BsonSerialization(#[from] bson::ser::Error),

    #[error("DynamoDB error: {0}")]
    Dynamo(String),

    #[error("Invalid record for user {user_id}: {reason}")]
    InvalidRecord { user_id: String, reason: String },

    #[error("Chat list for user {0} changed concurrently")]
    Conflict(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
