use crate::domain::error::{FeedError, Result};
use crate::domain::ports::GraphqlTransport;
use crate::domain::query::GraphqlRequest;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Per-render query state container.
///
/// Caches the `data` of every successful request by operation name and
/// variables. A fresh client starts empty, so two renders never observe each
/// other's results.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<ClientData>,
}

struct ClientData {
    transport: Arc<dyn GraphqlTransport>,
    cache: RwLock<HashMap<String, serde_json::Value>>,
}

impl QueryClient {
    pub fn new(transport: Arc<dyn GraphqlTransport>) -> Self {
        Self {
            inner: Arc::new(ClientData {
                transport,
                cache: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Return the cached result for `request` or execute it.
    pub async fn fetch_query<T: DeserializeOwned>(&self, request: GraphqlRequest) -> Result<T> {
        let key = request.cache_key();
        if let Some(data) = self.cached(&key) {
            debug!(%key, "query cache hit");
            return Ok(serde_json::from_value(data)?);
        }

        let response = self.inner.transport.execute(request).await?;
        if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
            return Err(FeedError::Graphql(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        let data = response.data.ok_or(FeedError::MissingData)?;
        let decoded = serde_json::from_value(data.clone())?;

        self.inner
            .cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, data);
        Ok(decoded)
    }

    pub fn cached_queries(&self) -> usize {
        self.inner
            .cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    fn cached(&self, key: &str) -> Option<serde_json::Value> {
        self.inner
            .cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockRegistry, MockedResponse};
    use crate::domain::query::{GraphqlErrorEntry, GraphqlResponse};
    use serde_json::json;

    fn request() -> GraphqlRequest {
        GraphqlRequest::new("query Count { n }", json!({ "first": 1 }))
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let registry = MockRegistry::new();
        registry.register(MockedResponse::new(
            request(),
            GraphqlResponse::data(json!({ "n": 3 })),
        ));
        let client = QueryClient::new(Arc::new(registry.clone()));

        let first: serde_json::Value = client.fetch_query(request()).await.unwrap();
        let second: serde_json::Value = client.fetch_query(request()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.received().len(), 1);
        assert_eq!(client.cached_queries(), 1);


        // Another client over the same registry starts cold and goes to the
        // network, where the one-shot mock is already consumed.
        let fresh = QueryClient::new(Arc::new(registry.clone()));
        assert_eq!(fresh.cached_queries(), 0);
        let err = fresh
            .fetch_query::<serde_json::Value>(request())
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::UnhandledRequest { .. }));
        assert_eq!(registry.received().len(), 2);
    }

    #[tokio::test]
    async fn test_graphql_errors_and_missing_data() {
        let registry = MockRegistry::new();
        registry.register(MockedResponse::new(
            request(),
            GraphqlResponse {
                data: None,
                errors: Some(vec![GraphqlErrorEntry {
                    message: "boom".into(),
                }]),
            },
        ));
        let client = QueryClient::new(Arc::new(registry.clone()));
        let err = client
            .fetch_query::<serde_json::Value>(request())
            .await
            .unwrap_err();
        assert_eq!(err, FeedError::Graphql(vec!["boom".into()]));

        registry.register(MockedResponse::new(request(), GraphqlResponse::default()));
        let err = client
            .fetch_query::<serde_json::Value>(request())
            .await
            .unwrap_err();
        assert_eq!(err, FeedError::MissingData);
        assert_eq!(client.cached_queries(), 0);
    }
}
