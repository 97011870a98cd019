#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use chat_history_api::InvocationEvent;
use chat_history_store::{
    ChatDocument, ChatStore, InMemoryChatStore, Result, StoreError, UserChatRecord,
};

/// Wraps a store and counts calls; can fail every call or only writes
pub struct RecordingStore {
    inner: InMemoryChatStore,
    fail_reads: bool,
    fail_writes: bool,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl RecordingStore {
    pub fn new(inner: InMemoryChatStore) -> Self {
        Self {
            inner,
            fail_reads: false,
            fail_writes: false,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            fail_writes: true,
            ..Self::new(InMemoryChatStore::new())
        }
    }

    /// Reads succeed; every write loses the length guard
    pub fn conflicting(inner: InMemoryChatStore) -> Self {
        Self {
            fail_writes: true,
            ..Self::new(inner)
        }
    }

    pub fn calls(&self) -> usize {
        self.reads.load(Ordering::SeqCst) + self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatStore for RecordingStore {
    async fn get_record(&self, user_id: &str) -> Result<Option<UserChatRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(StoreError::Connection("store unavailable".to_string()));
        }
        self.inner.get_record(user_id).await
    }

    async fn replace_chats(
        &self,
        user_id: &str,
        chats: Vec<ChatDocument>,
        expected_len: usize,
    ) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(StoreError::Connection("store unavailable".to_string()));
        }
        if self.fail_writes {
            return Err(StoreError::Conflict(format!(
                "chats of {} changed since they were read",
                user_id
            )));
        }
        self.inner.replace_chats(user_id, chats, expected_len).await
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

/// Record for "u1" with chats c1 (two messages) and c2 (no messages)
pub fn sample_record() -> UserChatRecord {
    UserChatRecord::from_value(
        "u1",
        json!({
            "userId": "u1",
            "chats": [
                {
                    "id": "c1",
                    "title": "T1",
                    "createdAt": "2024-05-01T10:00:00Z",
                    "messages": [
                        { "id": "m1", "role": "user", "content": "Hello", "mode": "chat" },
                        {
                            "id": "m2",
                            "role": "assistant",
                            "content": "Hi",
                            "model": "claude",
                            "attachment": {
                                "fileName": "a.png",
                                "fileType": "image/png",
                                "size": 2048,
                                "s3Key": "uploads/u1/a.png"
                            }
                        }
                    ]
                },
                { "id": "c2", "title": "T2", "messages": [] }
            ]
        }),
    )
    .expect("valid sample record")
}

pub fn sample_store() -> Arc<RecordingStore> {
    Arc::new(RecordingStore::new(InMemoryChatStore::with_records([
        sample_record(),
    ])))
}

/// HTTP API (v2) event for the chat detail route
pub fn detail_event(
    method: &str,
    chat_id: Option<&str>,
    user_id: Option<&str>,
) -> InvocationEvent {
    let mut event = json!({
        "version": "2.0",
        "requestContext": { "http": { "method": method } }
    });
    if let Some(sub) = user_id {
        event["requestContext"]["authorizer"] = json!({ "jwt": { "claims": { "sub": sub } } });
    }
    if let Some(chat_id) = chat_id {
        event["pathParameters"] = json!({ "chatId": chat_id });
    }
    InvocationEvent::new(event)
}

pub fn list_event(user_id: Option<&str>) -> InvocationEvent {
    let mut event = json!({ "requestContext": { "http": { "method": "GET" } } });
    if let Some(sub) = user_id {
        event["requestContext"]["authorizer"] = json!({ "jwt": { "claims": { "sub": sub } } });
    }
    InvocationEvent::new(event)
}

pub fn body(response: &chat_history_api::InvocationResponse) -> Value {
    response.body_json().expect("JSON body")
}
