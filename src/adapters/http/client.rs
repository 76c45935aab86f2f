use crate::adapters::mock::ADS_PATH;
use crate::domain::ad::Ad;
use crate::domain::error::{FeedError, Result};
use crate::domain::ports::{AdSource, GraphqlTransport};
use crate::domain::query::{GraphqlRequest, GraphqlResponse};
use async_trait::async_trait;
use tracing::debug;

/// GraphQL + ad endpoint client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    api_url: String,
    ads_url: String,
}

impl HttpTransport {
    pub fn new(api_url: impl Into<String>, ads_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: trim_base(api_url.into()),
            ads_url: trim_base(ads_url.into()),
        }
    }

    /// Both endpoints on the same host.
    pub fn single_host(base_url: impl Into<String>) -> Self {
        let base = base_url.into();
        Self::new(base.clone(), base)
    }

    pub fn graphql_url(&self) -> String {
        format!("{}/graphql", self.api_url)
    }

    pub fn ads_url(&self) -> String {
        format!("{}{}", self.ads_url, ADS_PATH)
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

async fn error_for_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(FeedError::Http {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn execute(&self, request: GraphqlRequest) -> Result<GraphqlResponse> {
        let url = self.graphql_url();
        debug!(%url, operation = request.operation_name(), "POST graphql");
        let resp = self.client.post(&url).json(&request).send().await?;
        let resp = error_for_status(resp).await?;
        Ok(resp.json::<GraphqlResponse>().await?)
    }
}

#[async_trait]
impl AdSource for HttpTransport {
    async fn fetch_ads(&self) -> Result<Vec<Ad>> {
        let url = self.ads_url();
        debug!(%url, "GET ads");
        let resp = self.client.get(&url).send().await?;
        let resp = error_for_status(resp).await?;
        Ok(resp.json::<Vec<Ad>>().await?)
    }
}
