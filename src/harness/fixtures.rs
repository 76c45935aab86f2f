//! Canned data for renders: a feed page, a logged-in user and an ad.

use crate::domain::ad::Ad;
use crate::domain::post::{FeedPage, PageInfo, Post, PostSource};
use crate::domain::session::LoggedUser;

pub fn post(id: &str, title: &str) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        permalink: format!("http://localhost:4000/r/{id}"),
        comments_permalink: format!("https://daily.dev/posts/{id}"),
        image: format!("https://daily.dev/images/{id}.jpg"),
        created_at: "2026-10-01T09:00:00.000Z".to_string(),
        num_comments: 0,
        num_upvotes: 0,
        read: false,
        upvoted: false,
        source: PostSource {
            id: "echojs".to_string(),
            name: "Echo JS".to_string(),
            image: "https://daily.dev/sources/echojs.png".to_string(),
        },
    }
}

pub fn default_feed_page() -> FeedPage {
    let posts = vec![
        Post {
            num_comments: 48,
            num_upvotes: 120,
            ..post("4f354bb73009e4adfa5dbcbf9b3c4ebf", "Learn SQL")
        },
        Post {
            num_comments: 31,
            num_upvotes: 64,
            read: true,
            ..post("6b58cf1a103636b0ec5ed4dc547d4c3e", "Async Rust in practice")
        },
        Post {
            num_comments: 17,
            num_upvotes: 22,
            ..post("73cd90bd4c71b86d1d6f258ec38bba29", "What a code review is for")
        },
    ];
    FeedPage::from_posts(
        posts,
        PageInfo {
            has_next_page: true,
            end_cursor: Some("YXJyYXljb25uZWN0aW9uOjI=".to_string()),
        },
    )
}

pub fn default_user() -> LoggedUser {
    LoggedUser {
        id: "u1".to_string(),
        name: "Ido Shamun".to_string(),
        username: "idoshamun".to_string(),
        email: "ido@acme.com".to_string(),
        image: "https://daily.dev/ido.png".to_string(),
        permalink: "https://daily.dev/idoshamun".to_string(),
        providers: vec!["github".to_string()],
        created_at: "2020-01-01T00:00:00.000Z".to_string(),
        reputation: 10,
    }
}

pub fn ad() -> Ad {
    Ad {
        description: "Learn how to build a better developer community".to_string(),
        image: "https://daily.dev/ads/community.png".to_string(),
        link: "https://daily.dev/ads/community".to_string(),
        source: "Daily".to_string(),
        company: Some("daily.dev".to_string()),
        pixel: vec!["https://daily.dev/pixel/1".to_string()],
    }
}
