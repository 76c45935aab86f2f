use crate::adapters::http::HttpTransport;
use crate::adapters::mock::MockRegistry;
use crate::app::page::{DiscussedPage, test_ids};
use crate::app::query_client::QueryClient;
use crate::config::{
    AppConfig, DEFAULT_ADDR, DEFAULT_API_URL, load_feed_fixture, load_user_fixture,
};
use crate::domain::ports::{AdSource, GraphqlTransport};
use crate::domain::post::FeedPage;
use crate::domain::query::{MOST_DISCUSSED_FEED_QUERY, QueryVariables};
use crate::domain::session::{Onboarding, SessionBundle, Settings};
use crate::harness::fixtures::{ad, default_user};
use crate::harness::render::create_feed_mock;
use crate::server::http::{PageFactory, build_mock_router, build_page_router, serve};
use anyhow::{Context as _, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "discussed", version, about = "Render the most discussed feed page")]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the page once and print it
    Render(RenderArgs),
    /// Serve the server-rendered page at /discussed
    Serve(ServeArgs),
    /// Serve canned feed responses over HTTP
    MockServer(MockServerArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    TestIds,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Feed fixture (JSON) answered in-process instead of a live API
    #[arg(long)]
    pub fixture: Option<PathBuf>,
    #[arg(long, env = "DISCUSSED_API_URL")]
    pub api_url: Option<String>,
    #[arg(long, env = "DISCUSSED_ADS_URL")]
    pub ads_url: Option<String>,
    /// Render as a logged-out visitor
    #[arg(long)]
    pub anonymous: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, env = "DISCUSSED_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
    #[arg(long, env = "DISCUSSED_ADS_URL")]
    pub ads_url: Option<String>,
    #[arg(long, env = "DISCUSSED_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: SocketAddr,
    /// User (JSON) the page renders for; visitors are logged out without it
    #[arg(long, env = "DISCUSSED_USER_FIXTURE")]
    pub user_fixture: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct MockServerArgs {
    #[arg(long)]
    pub fixture: PathBuf,
    #[arg(long, env = "DISCUSSED_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: SocketAddr,
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render(args) => render_page(&args).await,
        Command::Serve(args) => serve_page(serve_config(args)?).await,
        Command::MockServer(args) => serve_mock(&args.fixture, args.addr).await,
    }
}

/// Registry answering the first feed page for both user states, repeatedly.
pub fn fixture_registry(page: FeedPage) -> MockRegistry {
    let registry = MockRegistry::new();
    for logged_in in [true, false] {
        registry.register(
            create_feed_mock(
                page.clone(),
                MOST_DISCUSSED_FEED_QUERY,
                QueryVariables::new(7, logged_in, false),
            )
            .persist(),
        );
    }
    registry.persist_ads(vec![ad()]);
    registry
}

fn ports_for(args: &RenderArgs) -> Result<(Arc<dyn GraphqlTransport>, Arc<dyn AdSource>)> {
    if let Some(path) = &args.fixture {
        let registry = fixture_registry(load_feed_fixture(path)?);
        let transport: Arc<dyn GraphqlTransport> = Arc::new(registry.clone());
        let ads: Arc<dyn AdSource> = Arc::new(registry);
        return Ok((transport, ads));
    }
    let Some(api_url) = &args.api_url else {
        bail!("either --fixture or --api-url is required");
    };
    let ads_url = args.ads_url.clone().unwrap_or_else(|| api_url.clone());
    let client = Arc::new(HttpTransport::new(api_url.clone(), ads_url));
    let transport: Arc<dyn GraphqlTransport> = client.clone();
    let ads: Arc<dyn AdSource> = client;
    Ok((transport, ads))
}

pub async fn render_page(args: &RenderArgs) -> Result<()> {
    let (transport, ads) = ports_for(args)?;
    let user = (!args.anonymous).then(default_user);
    let session = SessionBundle::new(user, Settings::default(), Onboarding::default());
    let page = DiscussedPage::new(QueryClient::new(transport), ads, session);

    page.mount()
        .await
        .context("Failed to load the most discussed feed")?;

    match args.format {
        OutputFormat::Html => println!("{}", page.render_html()),
        OutputFormat::TestIds => print_post_items(&page),
    }
    Ok(())
}

fn print_post_items(page: &DiscussedPage) {
    let rendered = page.render_with_layout();
    let items = rendered.find_all_by_test_id(test_ids::POST_ITEM);
    println!("{} {} element(s)", test_ids::POST_ITEM, items.len());
    for (i, item) in items.iter().enumerate() {
        let id = item.get_attr("data-post-id").unwrap_or("?");
        println!("{}. [{}] {}", i + 1, id, item.text_content());
    }
}

fn serve_config(args: ServeArgs) -> Result<AppConfig> {
    let user = args
        .user_fixture
        .as_deref()
        .map(load_user_fixture)
        .transpose()?;
    Ok(AppConfig::new(args.api_url, args.ads_url, args.addr).with_user(user))
}

/// Pages for the configured endpoints and user.
pub fn page_factory(config: &AppConfig) -> PageFactory {
    let transport = Arc::new(HttpTransport::new(
        config.api_url.clone(),
        config.ads_url.clone(),
    ));
    PageFactory {
        transport: transport.clone(),
        ads: transport,
        user: config.user.clone(),
        settings: Settings::default(),
        onboarding: Onboarding::default(),
    }
}

pub async fn serve_page(config: AppConfig) -> Result<()> {
    info!(
        api_url = %config.api_url,
        ads_url = %config.ads_url,
        user = config.user.as_ref().map(|u| u.username.as_str()),
        "serving discussed page"
    );
    serve(build_page_router(page_factory(&config)), config.addr).await
}

pub async fn serve_mock(fixture: &Path, addr: SocketAddr) -> Result<()> {
    let page = load_feed_fixture(fixture)?;
    info!(posts = page.len(), fixture = %fixture.display(), "serving mock feed");
    serve(build_mock_router(fixture_registry(page)), addr).await
}
