use serde::{Deserialize, Serialize};

/// Where a post was published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSource {
    pub id: String,
    pub name: String,
    pub image: String,
}

/// A single content item displayed in a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub permalink: String,
    #[serde(default)]
    pub comments_permalink: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub num_comments: u32,
    #[serde(default)]
    pub num_upvotes: u32,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub upvoted: bool,
    pub source: PostSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEdge {
    pub node: Post,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// One page of a feed connection. Edge order is the display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub page_info: PageInfo,
    pub edges: Vec<PostEdge>,
}

impl FeedPage {
    pub fn from_posts(posts: Vec<Post>, page_info: PageInfo) -> Self {
        Self {
            page_info,
            edges: posts.into_iter().map(|node| PostEdge { node }).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}

/// `data` payload of a feed query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedData {
    pub page: FeedPage,
}
