use crate::domain::session::SessionBundle;
use serde::{Deserialize, Serialize};

/// Number of posts requested per feed page.
pub const FEED_PAGE_SIZE: u32 = 7;

pub const MOST_DISCUSSED_FEED_QUERY: &str = r#"query MostDiscussedFeed($loggedIn: Boolean! = false, $first: Int, $after: String, $unreadOnly: Boolean) {
  page: mostDiscussedFeed(first: $first, after: $after, unreadOnly: $unreadOnly) {
    pageInfo {
      hasNextPage
      endCursor
    }
    edges {
      node {
        id
        title
        permalink
        commentsPermalink
        image
        createdAt
        numComments
        numUpvotes
        source {
          id
          name
          image
        }
        read @include(if: $loggedIn)
        upvoted @include(if: $loggedIn)
      }
    }
  }
}"#;

/// Variables of a feed query.
///
/// `after` is left out of the wire form when absent, so a first-page request
/// serializes to exactly `{first, loggedIn, unreadOnly}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryVariables {
    pub first: u32,
    pub logged_in: bool,
    pub unread_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl Default for QueryVariables {
    fn default() -> Self {
        Self {
            first: FEED_PAGE_SIZE,
            logged_in: true,
            unread_only: false,
            after: None,
        }
    }
}

impl QueryVariables {
    pub fn new(first: u32, logged_in: bool, unread_only: bool) -> Self {
        Self {
            first,
            logged_in,
            unread_only,
            after: None,
        }
    }

    /// First-page variables for whoever is in the session.
    ///
    /// `unreadOnly` follows `settings.show_only_unread_posts`, and only for a
    /// logged-in user; anonymous requests always send `false`.
    pub fn for_session(session: &SessionBundle) -> Self {
        let logged_in = session.is_logged_in();
        Self::new(
            FEED_PAGE_SIZE,
            logged_in,
            logged_in && session.settings.show_only_unread_posts,
        )
    }

    /// Same variables, continuing after `cursor`.
    pub fn after(&self, cursor: impl Into<String>) -> Self {
        Self {
            after: Some(cursor.into()),
            ..self.clone()
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// A GraphQL request as it goes over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(default)]
    pub variables: serde_json::Value,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>, variables: serde_json::Value) -> Self {
        Self {
            query: query.into(),
            variables,
        }
    }

    pub fn operation_name(&self) -> &str {
        operation_name(&self.query).unwrap_or("anonymous")
    }

    /// Key under which the query client caches this request's result.
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.operation_name(), self.variables)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlErrorEntry {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphqlErrorEntry>>,
}

impl GraphqlResponse {
    pub fn data(data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            errors: None,
        }
    }
}

/// The named query plus its variables: identifies one feed page request.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedQuery {
    pub query: &'static str,
    pub variables: QueryVariables,
}

impl FeedQuery {
    pub fn most_discussed(variables: QueryVariables) -> Self {
        Self {
            query: MOST_DISCUSSED_FEED_QUERY,
            variables,
        }
    }

    pub fn request(&self) -> GraphqlRequest {
        GraphqlRequest::new(self.query, self.variables.to_json())
    }
}

/// Name of the first operation in a GraphQL document, e.g. `MostDiscussedFeed`.
pub fn operation_name(query: &str) -> Option<&str> {
    let rest = query.trim_start();
    let rest = rest
        .strip_prefix("query")
        .or_else(|| rest.strip_prefix("mutation"))?;
    let name = rest
        .trim_start()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()?;
    (!name.is_empty()).then_some(name)
}
