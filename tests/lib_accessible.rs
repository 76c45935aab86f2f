//! Sanity check: library and test common module are accessible.

mod common;

use discussed_feed::adapters::mock::MockRegistry;
use discussed_feed::domain::post::FeedPage;

#[test]
fn test_library_accessible() {
    let page = FeedPage::default();
    assert!(page.is_empty());
    assert_eq!(MockRegistry::new().pending(), 0);
}

#[test]
fn test_common_page_of() {
    use common::fixtures::page_of;

    let page = page_of(&["a", "b"], Some("next"));
    assert_eq!(page.len(), 2);
    assert!(page.page_info.has_next_page);
    assert!(!page_of(&["a"], None).page_info.has_next_page);
}

#[tokio::test]
async fn test_failing_transport_counts_calls() {
    use common::mock::FailingTransport;
    use discussed_feed::domain::ports::GraphqlTransport;
    use discussed_feed::domain::query::GraphqlRequest;

    let t = FailingTransport::new();
    let req = GraphqlRequest::new("query X { id }", serde_json::Value::Null);
    assert!(t.execute(req.clone()).await.is_err());
    assert!(t.execute(req).await.is_err());
    assert_eq!(t.calls(), 2);
}
