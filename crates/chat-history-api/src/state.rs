use std::sync::Arc;

use chat_history_store::ChatStore;

use crate::config::Config;
use crate::handlers::{ChatDetailHandler, ChatListHandler};

/// Shared application state passed to all routes
///
/// The store is created once at startup and injected into both handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ChatStore>,
    pub chat_list: ChatListHandler,
    pub chat_detail: ChatDetailHandler,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ChatStore>) -> Self {
        Self {
            config: Arc::new(config),
            chat_list: ChatListHandler::new(store.clone()),
            chat_detail: ChatDetailHandler::new(store.clone()),
            store,
        }
    }
}
