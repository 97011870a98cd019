use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ChatDocument, UserChatRecord};

/// Trait for the per-user chat record store
///
/// Implementations provide backend-specific point reads and the single
/// conditional write the delete path needs.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Read the user's whole record, `None` if the user has never chatted
    async fn get_record(&self, user_id: &str) -> Result<Option<UserChatRecord>>;

    /// Overwrite the record's `chats` field
    ///
    /// The write only applies while the stored list still holds
    /// `expected_len` chats; otherwise it fails with `StoreError::Conflict`
    /// and nothing is written.
    async fn replace_chats(
        &self,
        user_id: &str,
        chats: Vec<ChatDocument>,
        expected_len: usize,
    ) -> Result<()>;

    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;
}
