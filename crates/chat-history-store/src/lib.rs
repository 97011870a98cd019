pub mod models;
pub mod numeric;
pub mod error;
pub mod trait_client;
pub mod memory;
pub mod dbs;
pub mod builder;

pub use models::{ChatDocument, StoredChat, UserChatRecord};
pub use trait_client::ChatStore;
pub use memory::InMemoryChatStore;
pub use error::{Result, StoreError};
pub use builder::{ChatStoreBuilder, StoreBackend};

#[cfg(feature = "dynamodb")]
pub use dbs::dynamo::DynamoChatStore;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoChatStore;
