//! Transport doubles for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use discussed_feed::adapters::mock::MockRegistry;
use discussed_feed::domain::ad::Ad;
use discussed_feed::domain::error::{FeedError, Result};
use discussed_feed::domain::ports::{AdSource, GraphqlTransport};
use discussed_feed::domain::query::{GraphqlRequest, GraphqlResponse};

/// Transport whose requests never resolve.
pub struct PendingTransport;

#[async_trait]
impl GraphqlTransport for PendingTransport {
    async fn execute(&self, _request: GraphqlRequest) -> Result<GraphqlResponse> {
        std::future::pending().await
    }
}

/// Transport that fails every request with a network error.
pub struct FailingTransport {
    pub calls: AtomicUsize,
}

impl FailingTransport {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for FailingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphqlTransport for FailingTransport {
    async fn execute(&self, _request: GraphqlRequest) -> Result<GraphqlResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FeedError::Transport("connection refused".into()))
    }
}

/// Ad endpoint that never answers.
pub struct HangingAds;

#[async_trait]
impl AdSource for HangingAds {
    async fn fetch_ads(&self) -> Result<Vec<Ad>> {
        std::future::pending().await
    }
}

/// Registry behind a fixed network latency.
pub struct SlowTransport {
    pub registry: MockRegistry,
    pub latency: Duration,
}

#[async_trait]
impl GraphqlTransport for SlowTransport {
    async fn execute(&self, request: GraphqlRequest) -> Result<GraphqlResponse> {
        tokio::time::sleep(self.latency).await;
        self.registry.respond(&request)
    }
}
