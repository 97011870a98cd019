mod client;
mod models;

pub use client::MongoChatStore;
pub use models::{chats_to_bson, document_to_json, document_to_record};
