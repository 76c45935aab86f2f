use crate::domain::ad::Ad;
use crate::domain::error::{FeedError, Result};
use crate::domain::ports::{AdSource, GraphqlTransport};
use crate::domain::query::{GraphqlRequest, GraphqlResponse};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Path of the ad endpoint served alongside the GraphQL mocks.
pub const ADS_PATH: &str = "/v1/a";

/// A canned response for one exact `(query, variables)` request.
#[derive(Debug, Clone, PartialEq)]
pub struct MockedResponse {
    pub request: GraphqlRequest,
    pub result: GraphqlResponse,
    /// Keep answering after the first match.
    pub persist: bool,
}

impl MockedResponse {
    pub fn new(request: GraphqlRequest, result: GraphqlResponse) -> Self {
        Self {
            request,
            result,
            persist: false,
        }
    }

    pub fn persist(mut self) -> Self {
        self.persist = true;
        self
    }

    fn matches(&self, request: &GraphqlRequest) -> bool {
        self.request.query == request.query && self.request.variables == request.variables
    }
}

#[derive(Debug, Clone)]
struct AdMock {
    ads: Vec<Ad>,
    persist: bool,
}

#[derive(Debug, Default)]
struct RegistryData {
    pending: Vec<MockedResponse>,
    ads: Option<AdMock>,
    received: Vec<GraphqlRequest>,
}

/// Registry of pending network mocks. Cloning yields another handle to the
/// same registry; separate `MockRegistry::new()` calls never share state.
#[derive(Debug, Clone, Default)]
pub struct MockRegistry {
    inner: Arc<Mutex<RegistryData>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryData> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn register(&self, mock: MockedResponse) {
        debug!(
            operation = mock.request.operation_name(),
            variables = %mock.request.variables,
            persist = mock.persist,
            "registered GraphQL mock"
        );
        self.lock().pending.push(mock);
    }

    pub fn register_all(&self, mocks: impl IntoIterator<Item = MockedResponse>) {
        for mock in mocks {
            self.register(mock);
        }
    }

    /// Answer the next `GET /v1/a` with `ads`.
    pub fn register_ads(&self, ads: Vec<Ad>) {
        self.lock().ads = Some(AdMock {
            ads,
            persist: false,
        });
    }

    /// Answer every `GET /v1/a` with `ads`.
    pub fn persist_ads(&self, ads: Vec<Ad>) {
        self.lock().ads = Some(AdMock { ads, persist: true });
    }

    pub fn clear(&self) {
        let mut data = self.lock();
        data.pending.clear();
        data.ads = None;
        data.received.clear();
    }

    /// GraphQL mocks not yet consumed (persistent mocks always count).
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// True when every one-shot mock has been consumed.
    pub fn is_done(&self) -> bool {
        let data = self.lock();
        data.pending.iter().all(|m| m.persist) && data.ads.as_ref().is_none_or(|a| a.persist)
    }

    /// Every GraphQL request seen so far, matched or not.
    pub fn received(&self) -> Vec<GraphqlRequest> {
        self.lock().received.clone()
    }

    pub fn respond(&self, request: &GraphqlRequest) -> Result<GraphqlResponse> {
        let mut data = self.lock();
        data.received.push(request.clone());

        let Some(pos) = data.pending.iter().position(|m| m.matches(request)) else {
            warn!(
                operation = request.operation_name(),
                variables = %request.variables,
                "no mock matched request"
            );
            return Err(FeedError::UnhandledRequest {
                operation: request.operation_name().to_string(),
                variables: request.variables.clone(),
            });
        };

        let result = if data.pending[pos].persist {
            data.pending[pos].result.clone()
        } else {
            data.pending.remove(pos).result
        };
        debug!(operation = request.operation_name(), "mock answered request");
        Ok(result)
    }

    pub fn respond_ads(&self) -> Result<Vec<Ad>> {
        let mut data = self.lock();
        match data.ads.take() {
            Some(mock) if mock.persist => {
                let ads = mock.ads.clone();
                data.ads = Some(mock);
                Ok(ads)
            }
            Some(mock) => Ok(mock.ads),
            None => Err(FeedError::UnhandledRequest {
                operation: format!("GET {ADS_PATH}"),
                variables: serde_json::Value::Null,
            }),
        }
    }
}

#[async_trait]
impl GraphqlTransport for MockRegistry {
    async fn execute(&self, request: GraphqlRequest) -> Result<GraphqlResponse> {
        self.respond(&request)
    }
}

#[async_trait]
impl AdSource for MockRegistry {
    async fn fetch_ads(&self) -> Result<Vec<Ad>> {
        self.respond_ads()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mock(vars: serde_json::Value) -> MockedResponse {
        MockedResponse::new(
            GraphqlRequest::new("query Feed { id }", vars),
            GraphqlResponse::data(json!({ "page": null })),
        )
    }

    #[test]
    fn test_one_shot_mock_is_consumed() {
        let registry = MockRegistry::new();
        registry.register(mock(json!({ "first": 7 })));
        assert!(!registry.is_done());

        let req = GraphqlRequest::new("query Feed { id }", json!({ "first": 7 }));
        assert!(registry.respond(&req).is_ok());
        assert!(registry.is_done());
        assert!(matches!(
            registry.respond(&req),
            Err(FeedError::UnhandledRequest { .. })
        ));
        assert_eq!(registry.received().len(), 2);
    }

    #[test]
    fn test_persistent_mock_answers_repeatedly() {
        let registry = MockRegistry::new();
        registry.register(mock(json!({ "first": 7 })).persist());
        let req = GraphqlRequest::new("query Feed { id }", json!({ "first": 7 }));
        for _ in 0..3 {
            assert!(registry.respond(&req).is_ok());
        }
        assert_eq!(registry.pending(), 1);
        assert!(registry.is_done());
    }

    #[test]
    fn test_variables_must_match_exactly() {
        let registry = MockRegistry::new();
        registry.register(mock(json!({ "first": 7, "loggedIn": true })));
        let req = GraphqlRequest::new("query Feed { id }", json!({ "first": 8, "loggedIn": true }));
        let err = registry.respond(&req).unwrap_err();
        assert_eq!(
            err,
            FeedError::UnhandledRequest {
                operation: "Feed".into(),
                variables: json!({ "first": 8, "loggedIn": true }),
            }
        );
        assert_eq!(registry.pending(), 1);
    }

    #[test]
    fn test_ads_one_shot_and_clear() {
        let registry = MockRegistry::new();
        assert!(registry.respond_ads().is_err());

        registry.register_ads(Vec::new());
        assert!(registry.respond_ads().is_ok());
        assert!(registry.respond_ads().is_err());

        registry.persist_ads(Vec::new());
        registry.register(mock(json!({})));
        registry.clear();
        assert_eq!(registry.pending(), 0);
        assert!(registry.respond_ads().is_err());
        assert!(registry.received().is_empty());
    }
}
