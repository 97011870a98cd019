mod common;

use std::sync::Arc;

use serde_json::json;

use chat_history_api::ChatListHandler;
use chat_history_store::{ChatDocument, InMemoryChatStore, UserChatRecord};
use common::{body, list_event, sample_store, RecordingStore};

#[tokio::test]
async fn test_lists_id_and_title_in_stored_order() {
    let handler = ChatListHandler::new(sample_store());

    let response = handler.handle(&list_event(Some("u1"))).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(
        body(&response),
        json!([{ "id": "c1", "title": "T1" }, { "id": "c2", "title": "T2" }])
    );
    assert_eq!(response.headers["Access-Control-Allow-Methods"], "GET,OPTIONS");
    assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
}

#[tokio::test]
async fn test_unknown_user_gets_empty_list() {
    let handler = ChatListHandler::new(sample_store());

    let response = handler.handle(&list_event(Some("nobody"))).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(body(&response), json!([]));
}

#[tokio::test]
async fn test_record_without_chats_gets_empty_list() {
    let store = InMemoryChatStore::with_records([UserChatRecord::new("u2", vec![])]);
    let handler = ChatListHandler::new(Arc::new(store));

    let response = handler.handle(&list_event(Some("u2"))).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(body(&response), json!([]));
}

#[tokio::test]
async fn test_output_length_matches_chat_count() {
    let chats: Vec<ChatDocument> = (0..25)
        .map(|i| ChatDocument::new(format!("c{}", i), format!("Chat {}", i), vec![]))
        .collect();
    let store = InMemoryChatStore::with_records([UserChatRecord::new("u3", chats.clone())]);
    let handler = ChatListHandler::new(Arc::new(store));

    let items = handler.list(&list_event(Some("u3"))).await.unwrap();

    assert_eq!(items.len(), chats.len());
    for (item, chat) in items.iter().zip(&chats) {
        assert_eq!(item.id.as_deref(), chat.id());
        assert_eq!(item.title.as_deref(), chat.title());
    }
}

#[tokio::test]
async fn test_chat_without_title_lists_null() {
    let record = UserChatRecord::from_value("u4", json!({ "chats": [{ "id": "c1" }] })).unwrap();
    let handler = ChatListHandler::new(Arc::new(InMemoryChatStore::with_records([record])));

    let response = handler.handle(&list_event(Some("u4"))).await;

    assert_eq!(body(&response), json!([{ "id": "c1", "title": null }]));
}

#[tokio::test]
async fn test_missing_identity_is_generic_failure() {
    let store = sample_store();
    let handler = ChatListHandler::new(store.clone());

    let response = handler.handle(&list_event(None)).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(body(&response), json!({ "error": "Internal server error" }));
    assert!(!response.headers.contains_key("Access-Control-Allow-Methods"));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_store_failure_is_generic_failure() {
    let handler = ChatListHandler::new(Arc::new(RecordingStore::failing()));

    let response = handler.handle(&list_event(Some("u1"))).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(body(&response), json!({ "error": "Internal server error" }));
}
