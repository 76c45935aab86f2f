use anyhow::{Context as _, Result};
use std::net::SocketAddr;
use std::path::Path;

use crate::domain::post::{FeedData, FeedPage};
use crate::domain::session::LoggedUser;

pub const DEFAULT_API_URL: &str = "http://localhost:4000";
pub const DEFAULT_ADDR: &str = "127.0.0.1:5002";

/// Resolved endpoints, bind address and the user pages render for.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub ads_url: String,
    pub addr: SocketAddr,
    /// `None` serves every visitor as logged out.
    pub user: Option<LoggedUser>,
}

impl AppConfig {
    /// The ad endpoint defaults to the GraphQL host.
    pub fn new(api_url: String, ads_url: Option<String>, addr: SocketAddr) -> Self {
        let ads_url = ads_url.unwrap_or_else(|| api_url.clone());
        Self {
            api_url,
            ads_url,
            addr,
            user: None,
        }
    }

    pub fn with_user(mut self, user: Option<LoggedUser>) -> Self {
        self.user = user;
        self
    }
}

/// Read the user a served page renders for.
pub fn load_user_fixture(path: &Path) -> Result<LoggedUser> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read user fixture: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse user fixture: {}", path.display()))
}

/// Read a feed fixture: either a bare `FeedPage` or a `{ "page": ... }` payload.
pub fn load_feed_fixture(path: &Path) -> Result<FeedPage> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture: {}", path.display()))?;
    if let Ok(data) = serde_json::from_str::<FeedData>(&content) {
        return Ok(data.page);
    }
    serde_json::from_str::<FeedPage>(&content)
        .with_context(|| format!("Failed to parse feed fixture: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::fixtures::{default_feed_page, default_user};
    use std::io::Write;

    #[test]
    fn test_ads_url_defaults_to_api_url() {
        let addr: SocketAddr = DEFAULT_ADDR.parse().unwrap();
        let cfg = AppConfig::new(DEFAULT_API_URL.into(), None, addr);
        assert_eq!(cfg.ads_url, DEFAULT_API_URL);
        let cfg = AppConfig::new(DEFAULT_API_URL.into(), Some("http://ads".into()), addr);
        assert_eq!(cfg.ads_url, "http://ads");
        assert!(cfg.user.is_none());
    }

    #[test]
    fn test_load_user_fixture() {
        let user = default_user();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&user).unwrap()).unwrap();
        assert_eq!(load_user_fixture(file.path()).unwrap(), user);

        let mut minimal = tempfile::NamedTempFile::new().unwrap();
        write!(
            minimal,
            r#"{{"id":"u2","name":"Ada","username":"ada","email":"ada@example.com","image":"https://example.com/ada.png","permalink":"https://example.com/ada"}}"#
        )
        .unwrap();
        let loaded = load_user_fixture(minimal.path()).unwrap();
        assert_eq!(loaded.username, "ada");
        assert!(loaded.providers.is_empty());

        let err = load_user_fixture(Path::new("/nonexistent/user.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read user fixture"));
    }

    #[test]
    fn test_load_feed_fixture_accepts_both_shapes() {
        let page = default_feed_page();

        let mut bare = tempfile::NamedTempFile::new().unwrap();
        write!(bare, "{}", serde_json::to_string(&page).unwrap()).unwrap();
        assert_eq!(load_feed_fixture(bare.path()).unwrap(), page);

        let mut wrapped = tempfile::NamedTempFile::new().unwrap();
        let data = FeedData { page: page.clone() };
        write!(wrapped, "{}", serde_json::to_string(&data).unwrap()).unwrap();
        assert_eq!(load_feed_fixture(wrapped.path()).unwrap(), page);

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "not json").unwrap();
        assert!(load_feed_fixture(broken.path()).is_err());
    }
}
