pub mod chat_detail;
pub mod chat_list;

pub use chat_detail::ChatDetailHandler;
pub use chat_list::{ChatListHandler, ChatListItem};
