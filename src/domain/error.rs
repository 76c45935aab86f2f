use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeedError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeedError {
    /// No registered association matched the request.
    #[error("unhandled request: {operation} with variables {variables}")]
    UnhandledRequest {
        operation: String,
        variables: serde_json::Value,
    },

    #[error("network error: {0}")]
    Transport(String),

    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("GraphQL errors: {}", .0.join("; "))]
    Graphql(Vec<String>),

    #[error("response carried no data")]
    MissingData,
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FeedError::Decode(err.to_string())
        } else {
            FeedError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Decode(err.to_string())
    }
}
