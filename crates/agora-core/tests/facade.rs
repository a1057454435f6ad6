//! Query facade behavior against an in-memory store.

mod common;

use agora_core::{
    AnyDocument, Collection, Discussion, ErrorKind, ListMode, ListRequest, QueryFacade, RecordId,
    Response, SortDirection, SortKey, Store,
};
use common::MemoryStore;
use serde_json::json;

fn discussion(title: &str, category: &str) -> Discussion {
    Discussion {
        title: title.to_string(),
        content: format!("{} body", title),
        category: category.to_string(),
        author_id: RecordId::new("u1").unwrap(),
        author_name: Some("Ada".to_string()),
        response_count: 0,
    }
}

async fn seeded(count: usize, category: &str) -> (QueryFacade<MemoryStore>, Vec<RecordId>) {
    let facade = QueryFacade::new(MemoryStore::new());
    let mut ids = Vec::new();
    for i in 0..count {
        let id = facade
            .create(&discussion(&format!("Topic {}", i), category))
            .await
            .unwrap();
        ids.push(id);
    }
    (facade, ids)
}

#[tokio::test]
async fn cursor_pages_partition_the_collection() {
    let (facade, ids) = seeded(25, "general").await;

    let mut seen = Vec::new();
    let mut cursor = None;
    let mut pages = 0;
    loop {
        let request = ListRequest::new().page_size(10).after(cursor);
        let page = facade.list(Collection::Discussions, &request).await.unwrap();
        assert_eq!(page.mode, ListMode::Paged);
        pages += 1;
        seen.extend(page.items.into_iter().map(|doc| doc.id));
        cursor = page.next_cursor;
        if cursor.is_none() {
            break;
        }
    }

    assert_eq!(pages, 3);
    // Newest first.
    let expected: Vec<_> = ids.into_iter().rev().collect();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn short_page_has_no_cursor() {
    let (facade, _) = seeded(4, "general").await;
    let page = facade
        .list(Collection::Discussions, &ListRequest::new())
        .await
        .unwrap();
    assert_eq!(page.len(), 4);
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn filtered_listing_is_one_capped_batch() {
    let (facade, _) = seeded(60, "general").await;

    let request = ListRequest::new().filter("category", "general");
    let page = facade.list(Collection::Discussions, &request).await.unwrap();

    assert_eq!(page.mode, ListMode::FilteredBatch);
    assert_eq!(page.len(), 50);
    assert!(page.next_cursor.is_none());

    let (_, query) = facade.store().queries().pop().unwrap();
    assert_eq!(query.limit, Some(50));
    assert!(query.order_by.is_none());
}

#[tokio::test]
async fn filtered_listing_ignores_cursor() {
    let (facade, ids) = seeded(3, "general").await;

    let request = ListRequest::new()
        .filter("category", "general")
        .after(Some(agora_core::Cursor::new(ids[0].as_str())));
    let page = facade.list(Collection::Discussions, &request).await.unwrap();
    assert_eq!(page.len(), 3);
}

#[tokio::test]
async fn filtered_listing_sorts_in_memory() {
    let facade = QueryFacade::new(MemoryStore::new());
    let store = facade.store();
    store.insert_raw(
        Collection::Discussions,
        "quiet",
        json!({"category": "help", "responseCount": 1, "createdAt": "2024-01-03T00:00:00Z"}),
    );
    store.insert_raw(
        Collection::Discussions,
        "busy",
        json!({"category": "help", "responseCount": 7, "createdAt": "2024-01-01T00:00:00Z"}),
    );
    store.insert_raw(
        Collection::Discussions,
        "other",
        json!({"category": "news", "responseCount": 99}),
    );

    // Popularity is always most-responses first.
    let request = ListRequest::new()
        .filter("category", "help")
        .sort(SortKey::Popularity, SortDirection::Asc);
    let page = facade.list(Collection::Discussions, &request).await.unwrap();
    let ids: Vec<_> = page.items.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["busy", "quiet"]);

    let request = ListRequest::new()
        .filter("category", "help")
        .sort(SortKey::CreatedAt, SortDirection::Desc);
    let page = facade.list(Collection::Discussions, &request).await.unwrap();
    let ids: Vec<_> = page.items.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["quiet", "busy"]);
}

#[tokio::test]
async fn search_matches_case_insensitively() {
    let facade = QueryFacade::new(MemoryStore::new());
    facade.create(&discussion("Tagging guide", "meta")).await.unwrap();
    facade.create(&discussion("Release notes", "news")).await.unwrap();
    let mut tagged_body = discussion("Untitled", "meta");
    tagged_body.content = "How do TAGS work?".to_string();
    facade.create(&tagged_body).await.unwrap();

    let page = facade
        .list(Collection::Discussions, &ListRequest::new().search("tag"))
        .await
        .unwrap();
    let mut titles: Vec<_> = page
        .items
        .iter()
        .map(|d| d.get_str("title").unwrap().to_string())
        .collect();
    titles.sort();
    assert_eq!(titles, ["Tagging guide", "Untitled"]);
}

#[tokio::test]
async fn create_then_get_round_trips_fields() {
    let facade = QueryFacade::new(MemoryStore::new());
    let id = facade.create(&discussion("Hello", "general")).await.unwrap();

    let record = facade.get::<Discussion>(&id).await.unwrap();
    assert_eq!(record.id, id);
    assert_eq!(record.data.title, "Hello");
    assert_eq!(record.data.category, "general");
    assert!(record.created_at.is_some());
    assert_eq!(record.created_at, record.updated_at);
}

#[tokio::test]
async fn update_merges_and_bumps_updated_at() {
    let facade = QueryFacade::new(MemoryStore::new());
    let id = facade.create(&discussion("Draft", "general")).await.unwrap();

    let patch = agora_core::schema::DiscussionPatch {
        title: Some("Final".to_string()),
        ..Default::default()
    };
    facade.update::<Discussion>(&id, &patch).await.unwrap();

    let record = facade.get::<Discussion>(&id).await.unwrap();
    assert_eq!(record.data.title, "Final");
    assert_eq!(record.data.content, "Draft body");
    assert!(record.updated_at > record.created_at);
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let facade = QueryFacade::new(MemoryStore::new());
    let id = RecordId::new("ghost").unwrap();

    let err = facade.get::<Discussion>(&id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let patch = agora_core::schema::DiscussionPatch::default();
    let err = facade.update::<Discussion>(&id, &patch).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn create_any_routes_to_its_collection() {
    let facade = QueryFacade::new(MemoryStore::new());
    let owner = facade.create(&discussion("Owner", "general")).await.unwrap();
    let document = AnyDocument::from_json(
        Collection::Responses,
        json!({"discussionId": owner.as_str(), "content": "hi", "authorId": "u1"}),
    )
    .unwrap();

    facade.create_any(&document).await.unwrap();
    assert_eq!(facade.store().len(Collection::Responses), 1);
    let record = facade.get::<Discussion>(&owner).await.unwrap();
    assert_eq!(record.data.response_count, 1);
}

fn response(owner: &RecordId, content: &str) -> Response {
    Response {
        discussion_id: owner.clone(),
        content: content.to_string(),
        author_id: RecordId::new("u2").unwrap(),
        author_name: None,
    }
}

#[tokio::test]
async fn dependent_creates_and_deletes_move_the_owner_count() {
    let facade = QueryFacade::new(MemoryStore::new());
    let owner = facade.create(&discussion("Counted", "general")).await.unwrap();

    let mut ids = Vec::new();
    for i in 0..3 {
        ids.push(
            facade
                .create(&response(&owner, &format!("reply {}", i)))
                .await
                .unwrap(),
        );
    }
    let report = facade.delete(Collection::Responses, &ids[0]).await.unwrap();
    assert_eq!(report.dependents_deleted, 0);

    let record = facade.get::<Discussion>(&owner).await.unwrap();
    assert_eq!(record.data.response_count, 2);
    assert_eq!(facade.store().len(Collection::Responses), 2);

    // A second delete of the same response finds nothing and changes nothing.
    facade.delete(Collection::Responses, &ids[0]).await.unwrap();
    let record = facade.get::<Discussion>(&owner).await.unwrap();
    assert_eq!(record.data.response_count, 2);
}

#[tokio::test]
async fn dependent_of_missing_owner_is_not_created() {
    let facade = QueryFacade::new(MemoryStore::new());
    let ghost = RecordId::new("ghost").unwrap();

    let err = facade.create(&response(&ghost, "orphan")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(facade.store().len(Collection::Responses), 0);
}

#[tokio::test]
async fn dependents_cannot_be_set_by_id() {
    let facade = QueryFacade::new(MemoryStore::new());
    let owner = facade.create(&discussion("Owner", "general")).await.unwrap();
    let id = RecordId::new("chosen").unwrap();

    let err = facade.set(&id, &response(&owner, "hi")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(facade.store().len(Collection::Responses), 0);
}

#[tokio::test]
async fn deleting_a_response_of_a_deleted_discussion_succeeds() {
    let facade = QueryFacade::new(MemoryStore::new());
    let owner = facade.create(&discussion("Owner", "general")).await.unwrap();
    let id = facade.create(&response(&owner, "hi")).await.unwrap();
    facade
        .store()
        .delete_document(Collection::Discussions, &owner)
        .await
        .unwrap();

    facade.delete(Collection::Responses, &id).await.unwrap();
    assert_eq!(facade.store().len(Collection::Responses), 0);
}

#[tokio::test]
async fn counter_reflects_adjustments() {
    let facade = QueryFacade::new(MemoryStore::new());
    let id = facade.create(&discussion("Counted", "general")).await.unwrap();

    for _ in 0..5 {
        facade
            .adjust_counter(Collection::Discussions, &id, "responseCount", 1)
            .await
            .unwrap();
    }
    for _ in 0..2 {
        facade
            .adjust_counter(Collection::Discussions, &id, "responseCount", -1)
            .await
            .unwrap();
    }

    let record = facade.get::<Discussion>(&id).await.unwrap();
    assert_eq!(record.data.response_count, 3);
}

#[tokio::test]
async fn select_never_combines_filter_and_order() {
    let facade = QueryFacade::new(MemoryStore::new());
    facade.create(&discussion("A", "general")).await.unwrap();
    facade.create(&discussion("B", "general")).await.unwrap();

    let docs = facade
        .select(
            Collection::Discussions,
            Some(agora_core::FieldFilter::equals("category", "general")),
            Some((SortKey::CreatedAt, SortDirection::Desc)),
        )
        .await
        .unwrap();

    let titles: Vec<_> = docs.iter().map(|d| d.get_str("title").unwrap()).collect();
    assert_eq!(titles, ["B", "A"]);
}
