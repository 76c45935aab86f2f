use serde::{Deserialize, Serialize};

/// Sponsored item returned by `GET /v1/a`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub description: String,
    pub image: String,
    pub link: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default)]
    pub pixel: Vec<String>,
}
