mod attribute;
mod client;

pub use attribute::{item_to_json, json_to_attribute, to_json};
pub use client::DynamoChatStore;
