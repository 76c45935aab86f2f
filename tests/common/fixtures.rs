//! Feed fixtures for integration tests.
#![allow(dead_code)]

use discussed_feed::adapters::mock::MockedResponse;
use discussed_feed::domain::post::{FeedPage, PageInfo};
use discussed_feed::domain::query::{MOST_DISCUSSED_FEED_QUERY, QueryVariables};
use discussed_feed::harness::fixtures::{default_feed_page, post};
use discussed_feed::harness::create_feed_mock;

pub fn feed_mock(logged_in: bool) -> MockedResponse {
    create_feed_mock(
        default_feed_page(),
        MOST_DISCUSSED_FEED_QUERY,
        QueryVariables::new(7, logged_in, false),
    )
}

/// A page of `ids` ending at `cursor` (`None` = last page).
pub fn page_of(ids: &[&str], cursor: Option<&str>) -> FeedPage {
    FeedPage::from_posts(
        ids.iter().map(|id| post(id, &format!("Post {id}"))).collect(),
        PageInfo {
            has_next_page: cursor.is_some(),
            end_cursor: cursor.map(String::from),
        },
    )
}
