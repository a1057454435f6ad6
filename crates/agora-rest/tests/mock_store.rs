//! RestStore behavior against a mock HTTP store.

use agora_core::repo::{FieldFilter, OrderBy, SortDirection, StoreQuery};
use agora_core::{
    AccessToken, Collection, Cursor, Discussion, ErrorKind, ListMode, ListRequest, QueryFacade,
    RecordId, Store, StoreUrl,
};
use agora_rest::RestStore;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_url(server: &MockServer) -> StoreUrl {
    StoreUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

fn store(server: &MockServer) -> RestStore {
    RestStore::new(store_url(server), None).unwrap()
}

fn id(s: &str) -> RecordId {
    RecordId::new(s).unwrap()
}

// ============================================================================
// Queries
// ============================================================================

#[tokio::test]
async fn ordered_query_sends_params_and_returns_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/discussions"))
        .and(query_param("orderBy", "createdAt"))
        .and(query_param("direction", "desc"))
        .and(query_param("limit", "2"))
        .and(query_param("startAfter", "prev"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                {"id": "d2", "fields": {"title": "Second"}},
                {"id": "d1", "fields": {"title": "First"}}
            ],
            "cursor": "next"
        })))
        .mount(&server)
        .await;

    let query = StoreQuery {
        order_by: Some(OrderBy::new("createdAt", SortDirection::Desc)),
        limit: Some(2),
        start_after: Some(Cursor::new("prev")),
        ..Default::default()
    };
    let page = store(&server)
        .run_query(Collection::Discussions, &query)
        .await
        .unwrap();

    assert_eq!(page.documents.len(), 2);
    assert_eq!(page.documents[0].get_str("title"), Some("Second"));
    assert_eq!(page.last, Some(Cursor::new("next")));
}

#[tokio::test]
async fn filter_value_travels_as_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/responses"))
        .and(query_param("filterField", "discussionId"))
        .and(query_param("filterValue", "\"d1\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"documents": []})))
        .mount(&server)
        .await;

    let query = StoreQuery {
        filter: Some(FieldFilter::equals("discussionId", "d1")),
        ..Default::default()
    };
    let page = store(&server)
        .run_query(Collection::Responses, &query)
        .await
        .unwrap();
    assert!(page.documents.is_empty());
    assert!(page.last.is_none());
}

#[tokio::test]
async fn facade_pages_through_rest_store() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/discussions"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{"id": "d9", "fields": {
                "title": "Hello", "content": "c", "category": "general",
                "authorId": "u1", "responseCount": 2
            }}],
            "cursor": "after-d9"
        })))
        .mount(&server)
        .await;

    let facade = QueryFacade::new(store(&server));
    let page = facade
        .list_as::<Discussion>(&ListRequest::new().page_size(1))
        .await
        .unwrap();

    assert_eq!(page.mode, ListMode::Paged);
    assert_eq!(page.items[0].data.response_count, 2);
    assert_eq!(page.next_cursor, Some(Cursor::new("after-d9")));
}

// ============================================================================
// Single records
// ============================================================================

#[tokio::test]
async fn get_missing_record_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/discussions/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "NotFound",
            "message": "no such document"
        })))
        .mount(&server)
        .await;

    let err = store(&server)
        .get_document(Collection::Discussions, &id("ghost"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn add_posts_fields_and_returns_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/reports"))
        .and(body_json(json!({"fields": {"reason": "spam"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "r1"})))
        .mount(&server)
        .await;

    let serde_json::Value::Object(fields) = json!({"reason": "spam"}) else {
        unreachable!()
    };
    let created = store(&server)
        .add_document(Collection::Reports, fields)
        .await
        .unwrap();
    assert_eq!(created, id("r1"));
}

#[tokio::test]
async fn update_missing_record_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/users/u1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = store(&server)
        .update_document(Collection::Users, &id("u1"), serde_json::Map::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn increment_posts_field_and_delta() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/discussions/d1:increment"))
        .and(body_json(json!({"field": "responseCount", "delta": -1})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store(&server)
        .increment(Collection::Discussions, &id("d1"), "responseCount", -1)
        .await
        .unwrap();
}

#[tokio::test]
async fn deleting_absent_record_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/responses/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    store(&server)
        .delete_document(Collection::Responses, &id("gone"))
        .await
        .unwrap();
}

// ============================================================================
// Authentication and failures
// ============================================================================

#[tokio::test]
async fn bearer_token_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/users/u1"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let token = AccessToken::new("secret-token");
    let store = RestStore::new(store_url(&server), Some(&token)).unwrap();
    store
        .set_document(Collection::Users, &id("u1"), serde_json::Map::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn rejected_credentials_are_fetch_failures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/reports"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": "PermissionDenied",
            "message": "moderators only"
        })))
        .mount(&server)
        .await;

    let err = store(&server)
        .run_query(Collection::Reports, &StoreQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FetchFailed);
    assert!(err.to_string().contains("moderators only"));
}

#[tokio::test]
async fn server_errors_are_protocol_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/discussions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = store(&server)
        .run_query(Collection::Discussions, &StoreQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FetchFailed);
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn unreachable_store_is_transport_error() {
    let url = StoreUrl::new("http://127.0.0.1:1").unwrap();
    let store = RestStore::new(url, None).unwrap();

    let err = store
        .get_document(Collection::Discussions, &id("d1"))
        .await
        .unwrap_err();
    assert!(matches!(err, agora_core::Error::Transport(_)));
}
