use crate::domain::ad::Ad;
use crate::domain::error::Result;
use crate::domain::query::{GraphqlRequest, GraphqlResponse};
use crate::domain::session::LoggedUser;
use async_trait::async_trait;

/// GraphQL transport port (implemented by the mock registry and the HTTP client)
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, request: GraphqlRequest) -> Result<GraphqlResponse>;
}

/// Ad endpoint port (`GET /v1/a`)
#[async_trait]
pub trait AdSource: Send + Sync {
    async fn fetch_ads(&self) -> Result<Vec<Ad>>;
}

/// Session callbacks a page may trigger
pub trait SessionActions: Send + Sync {
    fn show_login(&self);
    fn logout(&self);
    fn update_user(&self, user: &LoggedUser);
}
