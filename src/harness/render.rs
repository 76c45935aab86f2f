use crate::adapters::mock::{MockRegistry, MockedResponse};
use crate::app::page::DiscussedPage;
use crate::app::query_client::QueryClient;
use crate::app::render::Element;
use crate::domain::error::Result as FeedResult;
use crate::domain::ports::SessionActions;
use crate::domain::post::{FeedData, FeedPage};
use crate::domain::query::{
    GraphqlRequest, GraphqlResponse, MOST_DISCUSSED_FEED_QUERY, QueryVariables,
};
use crate::domain::session::{LoggedUser, Onboarding, SessionBundle, Settings};
use crate::harness::fixtures::{ad, default_feed_page, default_user};
use crate::harness::wait::{WaitError, WaitOptions, wait_for};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Request/response pair answering a feed query with `page`.
pub fn create_feed_mock(page: FeedPage, query: &str, variables: QueryVariables) -> MockedResponse {
    let data = serde_json::to_value(FeedData { page }).unwrap_or(serde_json::Value::Null);
    MockedResponse::new(
        GraphqlRequest::new(query, variables.to_json()),
        GraphqlResponse::data(data),
    )
}

/// The logged-in first page: `{first: 7, loggedIn: true, unreadOnly: false}`.
pub fn create_default_feed_mock() -> MockedResponse {
    create_feed_mock(
        default_feed_page(),
        MOST_DISCUSSED_FEED_QUERY,
        QueryVariables::default(),
    )
}

/// Session callbacks that count their invocations.
#[derive(Debug, Default)]
pub struct RecordingActions {
    show_login: AtomicUsize,
    logout: AtomicUsize,
    updated_users: Mutex<Vec<LoggedUser>>,
}

impl RecordingActions {
    pub fn show_login_calls(&self) -> usize {
        self.show_login.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.logout.load(Ordering::SeqCst)
    }

    pub fn updated_users(&self) -> Vec<LoggedUser> {
        self.updated_users
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl SessionActions for RecordingActions {
    fn show_login(&self) {
        self.show_login.fetch_add(1, Ordering::SeqCst);
    }

    fn logout(&self) {
        self.logout.fetch_add(1, Ordering::SeqCst);
    }

    fn update_user(&self, user: &LoggedUser) {
        self.updated_users
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(user.clone());
    }
}

/// Handle on a rendered page.
pub struct RenderResult {
    pub page: DiscussedPage,
    pub registry: MockRegistry,
    pub client: QueryClient,
    pub actions: Arc<RecordingActions>,
    mount: Option<JoinHandle<FeedResult<()>>>,
}

impl RenderResult {
    /// The page as currently rendered, layout included.
    pub fn snapshot(&self) -> Element {
        self.page.render_with_layout()
    }

    /// Elements tagged `id` right now, without waiting.
    pub fn query_all_by_test_id(&self, id: &str) -> Vec<Element> {
        self.snapshot()
            .find_all_by_test_id(id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Wait (default options) until at least one element is tagged `id`.
    pub async fn find_all_by_test_id(&self, id: &str) -> Result<Vec<Element>, WaitError> {
        self.find_all_by_test_id_with(id, WaitOptions::default())
            .await
    }

    pub async fn find_all_by_test_id_with(
        &self,
        id: &str,
        options: WaitOptions,
    ) -> Result<Vec<Element>, WaitError> {
        wait_for(options, move || async move {
            let found = self.query_all_by_test_id(id);
            if found.is_empty() {
                Err(format!("unable to find an element by test id `{id}`"))
            } else {
                Ok(found)
            }
        })
        .await
    }

    /// Outcome of the page's mount, once it has finished. `None` when already
    /// taken or the mount task did not complete.
    pub async fn mount_result(&mut self) -> Option<FeedResult<()>> {
        self.mount.take()?.await.ok()
    }
}

/// Render with the default mocks and the default logged-in user.
pub fn render_default() -> RenderResult {
    render_component(vec![create_default_feed_mock()], Some(default_user()))
}

/// Render the page for `user` (anonymous when `None`) against a fresh mock
/// registry holding `mocks` and the ad mock.
///
/// Must be called from within a tokio runtime.
pub fn render_component(mocks: Vec<MockedResponse>, user: Option<LoggedUser>) -> RenderResult {
    let session = SessionBundle::new(user, Settings::default(), Onboarding::default());
    render_with_session(MockRegistry::new(), mocks, session)
}

/// Like [`render_component`] but with a caller-supplied registry and session.
/// The session's actions are replaced by a [`RecordingActions`].
pub fn render_with_session(
    registry: MockRegistry,
    mocks: Vec<MockedResponse>,
    session: SessionBundle,
) -> RenderResult {
    registry.register_all(mocks);
    registry.register_ads(vec![ad()]);

    let actions = Arc::new(RecordingActions::default());
    let session = session.with_actions(actions.clone());
    let client = QueryClient::new(Arc::new(registry.clone()));
    let page = DiscussedPage::new(client.clone(), Arc::new(registry.clone()), session);

    let mounting = page.clone();
    let mount = tokio::spawn(async move { mounting.mount().await });

    RenderResult {
        page,
        registry,
        client,
        actions,
        mount: Some(mount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_actions_count_calls() {
        let actions = RecordingActions::default();
        actions.show_login();
        actions.show_login();
        actions.logout();
        actions.update_user(&default_user());
        assert_eq!(actions.show_login_calls(), 2);
        assert_eq!(actions.logout_calls(), 1);
        assert_eq!(actions.updated_users(), vec![default_user()]);
    }

    #[test]
    fn test_default_feed_mock_request_shape() {
        let mock = create_default_feed_mock();
        assert_eq!(mock.request.query, MOST_DISCUSSED_FEED_QUERY);
        assert_eq!(
            mock.request.variables,
            serde_json::json!({ "first": 7, "loggedIn": true, "unreadOnly": false })
        );
        assert!(!mock.persist);
        let data: FeedData =
            serde_json::from_value(mock.result.data.clone().unwrap()).unwrap();
        assert_eq!(data.page, default_feed_page());
    }

    #[tokio::test]
    async fn test_render_component_session_matches_defaults() {
        let screen = render_component(Vec::new(), None);
        let session = screen.page.session();
        assert_eq!(session.settings, Settings::default());
        assert_eq!(session.onboarding, Onboarding::default());
        assert_eq!(session.settings.spaciness.as_str(), "eco");
        assert!(session.settings.open_new_tab);
        assert!(!session.settings.show_only_unread_posts);
        assert_eq!(session.onboarding.onboarding_step, 3);
    }
}
