use mockbase_core::{FindResult, Item, ListQuery, QueryEngine, SortKey, Store};
use serde_json::json;

fn blog() -> Store {
    Store::from_snapshot(json!({
        "posts": [
            {"id": "1", "title": "a", "views": 100, "published": true},
            {"id": "2", "title": "b", "views": 200, "published": false},
            {"id": "3", "title": "c", "views": 300, "published": true},
        ],
        "comments": [
            {"id": "1", "postId": "1", "text": "nice"},
        ],
        "profile": {"name": "typicode"},
    }))
    .unwrap()
}

fn ids(result: FindResult) -> Vec<String> {
    result
        .into_items()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

fn record(value: serde_json::Value) -> Item {
    value.as_object().cloned().unwrap()
}

#[test]
fn lt_filter_keeps_matching_records_in_order() {
    let engine = QueryEngine::new();
    let query = ListQuery::from_pairs([("views_lt", "300")]);
    let result = engine.find(&blog(), "posts", &query).unwrap();
    assert_eq!(ids(result), ["1", "2"]);
}

#[test]
fn range_and_equality_filters_combine_with_and() {
    let engine = QueryEngine::new();
    let query = ListQuery::from_pairs([
        ("views_gte", "100"),
        ("views_lte", "200"),
        ("published", "true"),
    ]);
    assert_eq!(ids(engine.find(&blog(), "posts", &query).unwrap()), ["1"]);

    let ne = ListQuery::from_pairs([("title_ne", "b")]);
    assert_eq!(ids(engine.find(&blog(), "posts", &ne).unwrap()), ["1", "3"]);
}

#[test]
fn repeated_values_match_any() {
    let engine = QueryEngine::new();
    let query = ListQuery::from_pairs([("id", "1"), ("id", "3")]);
    assert_eq!(ids(engine.find(&blog(), "posts", &query).unwrap()), ["1", "3"]);
}

#[test]
fn id_equality_does_not_match_numerically_equal_hex_ids() {
    let engine = QueryEngine::new();
    let store = Store::from_snapshot(json!({
        "rows": [{"id": "0012"}, {"id": "12"}, {"id": "1e3"}, {"id": "1000"}],
    }))
    .unwrap();

    let twelve = ListQuery::from_pairs([("id", "12")]);
    assert_eq!(ids(engine.find(&store, "rows", &twelve).unwrap()), ["12"]);

    let thousand = ListQuery::from_pairs([("id", "1000")]);
    assert_eq!(ids(engine.find(&store, "rows", &thousand).unwrap()), ["1000"]);

    let not_twelve = ListQuery::from_pairs([("id_ne", "12")]);
    assert_eq!(
        ids(engine.find(&store, "rows", &not_twelve).unwrap()),
        ["0012", "1e3", "1000"]
    );
}

#[test]
fn no_params_returns_full_list_in_insertion_order() {
    let engine = QueryEngine::new();
    let result = engine.find(&blog(), "posts", &ListQuery::new()).unwrap();
    assert_eq!(ids(result), ["1", "2", "3"]);
}

#[test]
fn sort_descending_then_slice() {
    let engine = QueryEngine::new();
    let sorted = ListQuery::from_pairs([("_sort", "-views")]);
    assert_eq!(
        ids(engine.find(&blog(), "posts", &sorted).unwrap()),
        ["3", "2", "1"]
    );

    let sliced = ListQuery::new()
        .sort_by(SortKey::ascending("views"))
        .slice(Some(1), Some(3), None);
    assert_eq!(ids(engine.find(&blog(), "posts", &sliced).unwrap()), ["2", "3"]);

    let limited = ListQuery::from_pairs([("_start", "0"), ("_limit", "2")]);
    assert_eq!(ids(engine.find(&blog(), "posts", &limited).unwrap()), ["1", "2"]);
}

#[test]
fn page_mode_wraps_results_with_navigation() {
    let engine = QueryEngine::new();
    let query = ListQuery::from_pairs([("_page", "1"), ("_per_page", "2")]);
    let page = engine
        .find(&blog(), "posts", &query)
        .unwrap()
        .into_page()
        .unwrap();

    let value = serde_json::to_value(&page).unwrap();
    assert_eq!(
        value,
        json!({
            "first": 1,
            "prev": null,
            "next": 2,
            "last": 2,
            "pages": 2,
            "items": 3,
            "data": [
                {"id": "1", "title": "a", "views": 100, "published": true},
                {"id": "2", "title": "b", "views": 200, "published": false},
            ],
        })
    );
}

#[test]
fn page_mode_counts_filtered_records_only() {
    let engine = QueryEngine::new();
    let query = ListQuery::from_pairs([("published", "true"), ("_page", "1")]);
    let page = engine
        .find(&blog(), "posts", &query)
        .unwrap()
        .into_page()
        .unwrap();
    assert_eq!(page.items, 2);
    assert_eq!(page.pages, 1);
    assert_eq!(page.next, None);
}

#[test]
fn embedding_attaches_matching_children() {
    let engine = QueryEngine::new();
    let store = blog();
    let embed = vec!["comments".to_string()];

    let post = engine.find_by_id(&store, "posts", "1", &embed).unwrap();
    assert_eq!(
        post["comments"],
        json!([{"id": "1", "postId": "1", "text": "nice"}])
    );

    let lonely = engine.find_by_id(&store, "posts", "2", &embed).unwrap();
    assert_eq!(lonely["comments"], json!([]));

    let listed = engine
        .find(&store, "posts", &ListQuery::new().embed("comments"))
        .unwrap()
        .into_items()
        .unwrap();
    assert!(listed.iter().all(|post| post.contains_key("comments")));
}

#[test]
fn embedding_does_not_touch_the_store() {
    let engine = QueryEngine::new();
    let store = blog();
    let before = store.clone();
    engine.find_by_id(&store, "posts", "1", &["comments".to_string()]);
    assert_eq!(store, before);
}

#[test]
fn find_by_id_is_idempotent() {
    let engine = QueryEngine::new();
    let store = blog();
    let embed = vec!["comments".to_string()];
    let first = engine.find_by_id(&store, "posts", "1", &embed);
    let second = engine.find_by_id(&store, "posts", "1", &embed);
    assert_eq!(first, second);
}

#[test]
fn singleton_find_returns_record_unfiltered() {
    let engine = QueryEngine::new();
    let query = ListQuery::from_pairs([("name", "someone-else"), ("_page", "3")]);
    match engine.find(&blog(), "profile", &query).unwrap() {
        FindResult::Singleton(item) => assert_eq!(item, record(json!({"name": "typicode"}))),
        other => panic!("expected singleton, got {other:?}"),
    }
}

#[test]
fn unknown_collection_reads_are_none() {
    let engine = QueryEngine::new();
    let store = blog();
    assert!(!engine.has(&store, "users"));
    assert!(engine.find(&store, "users", &ListQuery::new()).is_none());
    assert!(engine.find_by_id(&store, "users", "1", &[]).is_none());
}
