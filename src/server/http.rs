use crate::adapters::mock::{ADS_PATH, MockRegistry};
use crate::app::page::DiscussedPage;
use crate::app::query_client::QueryClient;
use crate::domain::ports::{AdSource, GraphqlTransport};
use crate::domain::query::{GraphqlErrorEntry, GraphqlRequest, GraphqlResponse};
use crate::domain::session::{LoggedUser, Onboarding, SessionBundle, Settings};
use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

#[derive(Debug, Clone, serde::Serialize)]
struct ApiErrorBody {
    error: String,
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> impl IntoResponse {
    (status, Json(ApiErrorBody { error: msg.into() }))
}

/// Serves a [`MockRegistry`] over HTTP: `POST /graphql` and `GET /v1/a`.
pub fn build_mock_router(registry: MockRegistry) -> Router {
    Router::new()
        .route("/health", get(mock_health))
        .route("/graphql", post(graphql))
        .route(ADS_PATH, get(ads))
        .with_state(registry)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn mock_health(State(registry): State<MockRegistry>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "pending": registry.pending(),
    }))
}

async fn graphql(
    State(registry): State<MockRegistry>,
    Json(req): Json<GraphqlRequest>,
) -> impl IntoResponse {
    match registry.respond(&req) {
        Ok(res) => Json(res).into_response(),
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(GraphqlResponse {
                data: None,
                errors: Some(vec![GraphqlErrorEntry {
                    message: e.to_string(),
                }]),
            }),
        )
            .into_response(),
    }
}

async fn ads(State(registry): State<MockRegistry>) -> impl IntoResponse {
    match registry.respond_ads() {
        Ok(ads) => Json(ads).into_response(),
        Err(e) => api_error(StatusCode::NOT_FOUND, e.to_string()).into_response(),
    }
}

/// Everything needed to build a fresh page per request.
#[derive(Clone)]
pub struct PageFactory {
    pub transport: Arc<dyn GraphqlTransport>,
    pub ads: Arc<dyn AdSource>,
    pub user: Option<LoggedUser>,
    pub settings: Settings,
    pub onboarding: Onboarding,
}

impl PageFactory {
    pub fn page(&self, anonymous: bool) -> DiscussedPage {
        let user = if anonymous { None } else { self.user.clone() };
        let session = SessionBundle::new(user, self.settings.clone(), self.onboarding.clone());
        DiscussedPage::new(
            QueryClient::new(self.transport.clone()),
            self.ads.clone(),
            session,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
struct DiscussedQuery {
    #[serde(default)]
    anonymous: bool,
}

/// Server-rendered `/discussed` page.
pub fn build_page_router(factory: PageFactory) -> Router {
    Router::new()
        .route("/health", get(page_health))
        .route("/discussed", get(discussed))
        .with_state(Arc::new(factory))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn page_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn discussed(
    State(factory): State<Arc<PageFactory>>,
    Query(q): Query<DiscussedQuery>,
) -> impl IntoResponse {
    let page = factory.page(q.anonymous);
    match page.mount().await {
        Ok(()) => (StatusCode::OK, Html(page.render_html())),
        Err(e) => {
            warn!(error = %e, "rendering discussed page without feed");
            (StatusCode::BAD_GATEWAY, Html(page.render_html()))
        }
    }
}

pub async fn serve(app: Router, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
