mod record;

pub use record::{ChatDocument, StoredChat, UserChatRecord};
