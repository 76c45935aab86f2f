use crate::app::query_client::QueryClient;
use crate::app::render::{Element, render_document};
use crate::domain::ad::Ad;
use crate::domain::error::Result;
use crate::domain::ports::AdSource;
use crate::domain::post::{FeedData, PageInfo, Post};
use crate::domain::query::{FeedQuery, QueryVariables};
use crate::domain::session::SessionBundle;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const PAGE_TITLE: &str = "Most Discussed";

/// How long `mount` waits for ads once the feed has loaded.
pub const AD_WAIT: Duration = Duration::from_millis(500);

pub mod test_ids {
    pub const POST_ITEM: &str = "postItem";
    pub const FEED: &str = "feed";
    pub const FEED_LOADING: &str = "feedLoading";
    pub const FEED_EMPTY: &str = "feedEmpty";
    pub const AD_ITEM: &str = "adItem";
    pub const LOGIN_BUTTON: &str = "loginButton";
    pub const PROFILE_IMAGE: &str = "profileImage";
    pub const REFERRAL_BANNER: &str = "referralBanner";
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    /// Mounted, waiting for the feed query.
    Initial,
    Loaded {
        posts: Vec<Post>,
        page_info: PageInfo,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpvoteOutcome {
    LoginRequired,
    Upvoted,
    Removed,
    NotFound,
}

/// The "most discussed" feed view.
///
/// All collaborators are injected at construction; the page reads them and
/// owns nothing but its own view state. Cloning yields another handle to the
/// same page.
#[derive(Clone)]
pub struct DiscussedPage {
    inner: Arc<PageInner>,
}

struct PageInner {
    client: QueryClient,
    ads: Arc<dyn AdSource>,
    session: SessionBundle,
    view: RwLock<ViewData>,
}

struct ViewData {
    state: PageState,
    ad: Option<Ad>,
    variables: QueryVariables,
    /// Cursor of the next-page request in flight.
    loading_more: Option<String>,
}

impl DiscussedPage {
    pub fn new(client: QueryClient, ads: Arc<dyn AdSource>, session: SessionBundle) -> Self {
        let variables = QueryVariables::for_session(&session);
        Self {
            inner: Arc::new(PageInner {
                client,
                ads,
                session,
                view: RwLock::new(ViewData {
                    state: PageState::Initial,
                    ad: None,
                    variables,
                    loading_more: None,
                }),
            }),
        }
    }

    fn view(&self) -> RwLockReadGuard<'_, ViewData> {
        self.inner.view.read().unwrap_or_else(|e| e.into_inner())
    }

    fn view_mut(&self) -> RwLockWriteGuard<'_, ViewData> {
        self.inner.view.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn session(&self) -> &SessionBundle {
        &self.inner.session
    }

    pub fn state(&self) -> PageState {
        self.view().state.clone()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.view().state, PageState::Loaded { .. })
    }

    /// Variables of the first-page request this page issues.
    pub fn variables(&self) -> QueryVariables {
        self.view().variables.clone()
    }

    pub fn posts(&self) -> Vec<Post> {
        match &self.view().state {
            PageState::Initial => Vec::new(),
            PageState::Loaded { posts, .. } => posts.clone(),
        }
    }

    pub fn ad(&self) -> Option<Ad> {
        self.view().ad.clone()
    }

    /// Issue the feed query and, on success, move to `Loaded`.
    ///
    /// Ads are fetched on their own task; the feed state is committed as soon
    /// as the feed answers, then the ads are awaited for at most `AD_WAIT`.
    /// On failure the page stays `Initial` and the error is returned.
    pub async fn mount(&self) -> Result<()> {
        let variables = self.variables();
        info!(
            logged_in = variables.logged_in,
            first = variables.first,
            unread_only = variables.unread_only,
            "requesting most discussed feed"
        );
        let request = FeedQuery::most_discussed(variables).request();

        let page = self.clone();
        let ads = tokio::spawn(async move {
            match page.inner.ads.fetch_ads().await {
                Ok(ads) => page.view_mut().ad = ads.into_iter().next(),
                Err(e) => warn!(error = %e, "failed to fetch ads"),
            }
        });

        let data = self
            .inner
            .client
            .fetch_query::<FeedData>(request)
            .await
            .inspect_err(|e| warn!(error = %e, "most discussed feed query failed"))?;
        let page_info = data.page.page_info.clone();
        let posts = data.page.into_posts();
        info!(posts = posts.len(), "most discussed feed loaded");
        self.view_mut().state = PageState::Loaded { posts, page_info };

        if tokio::time::timeout(AD_WAIT, ads).await.is_err() {
            warn!(waited = ?AD_WAIT, "ads still pending, rendering without them");
        }
        Ok(())
    }

    /// Fetch the next page and append it. Returns `false` when there is
    /// nothing to fetch or another page request is already in flight.
    pub async fn load_more(&self) -> Result<bool> {
        let cursor = {
            let mut view = self.view_mut();
            let cursor = match &view.state {
                PageState::Loaded { page_info, .. } if page_info.has_next_page => {
                    page_info.end_cursor.clone()
                }
                _ => None,
            };
            match cursor {
                Some(cursor) if view.loading_more.is_none() => {
                    view.loading_more = Some(cursor.clone());
                    cursor
                }
                _ => return Ok(false),
            }
        };

        let variables = self.variables().after(cursor.as_str());
        debug!(after = %cursor, "requesting next feed page");
        let fetched = self
            .inner
            .client
            .fetch_query::<FeedData>(FeedQuery::most_discussed(variables).request())
            .await;

        let mut view = self.view_mut();
        view.loading_more = None;
        let data = fetched?;
        if let PageState::Loaded { posts, page_info } = &mut view.state {
            // Only extend the page the cursor was taken from.
            if page_info.end_cursor.as_deref() != Some(cursor.as_str()) {
                return Ok(false);
            }
            *page_info = data.page.page_info.clone();
            posts.extend(data.page.into_posts());
        }
        Ok(true)
    }

    /// Toggle the current user's upvote on a post. Anonymous users are asked
    /// to log in instead.
    pub fn upvote(&self, post_id: &str) -> UpvoteOutcome {
        if !self.session().is_logged_in() {
            self.session().actions.show_login();
            return UpvoteOutcome::LoginRequired;
        }

        let mut view = self.view_mut();
        let PageState::Loaded { posts, .. } = &mut view.state else {
            return UpvoteOutcome::NotFound;
        };
        let Some(post) = posts.iter_mut().find(|p| p.id == post_id) else {
            return UpvoteOutcome::NotFound;
        };

        if post.upvoted {
            post.upvoted = false;
            post.num_upvotes = post.num_upvotes.saturating_sub(1);
            UpvoteOutcome::Removed
        } else {
            post.upvoted = true;
            post.num_upvotes += 1;
            UpvoteOutcome::Upvoted
        }
    }

    /// The feed section alone.
    pub fn render(&self) -> Element {
        let view = self.view();
        let settings = &self.session().settings;

        let layout = if settings.insane_mode {
            "feed-list"
        } else {
            "feed-grid"
        };
        let section = Element::new("section")
            .test_id(test_ids::FEED)
            .attr(
                "class",
                format!("feed feed-{} {}", settings.spaciness.as_str(), layout),
            )
            .attr("aria-label", PAGE_TITLE);

        let posts = match &view.state {
            PageState::Initial => {
                return section.attr("aria-busy", "true").child(
                    Element::new("div")
                        .test_id(test_ids::FEED_LOADING)
                        .text("Loading…"),
                );
            }
            PageState::Loaded { posts, .. } => posts,
        };

        if posts.is_empty() {
            return section.child(
                Element::new("p")
                    .test_id(test_ids::FEED_EMPTY)
                    .text("Nothing is being discussed right now."),
            );
        }

        let ad = view.ad.as_ref().map(|ad| self.render_ad(ad));
        section
            .children(ad)
            .children(posts.iter().map(|post| self.render_post(post)))
    }

    fn render_post(&self, post: &Post) -> Element {
        let class = if post.read { "post card read" } else { "post card" };
        let mut link = Element::new("a")
            .attr("href", post.permalink.as_str())
            .attr("title", post.title.as_str());
        if self.session().settings.open_new_tab {
            link = link.attr("target", "_blank").attr("rel", "noopener");
        }
        link = link.child(Element::new("h3").text(post.title.as_str()));

        let mut article = Element::new("article")
            .test_id(test_ids::POST_ITEM)
            .attr("class", class)
            .attr("data-post-id", post.id.as_str())
            .child(link);
        if !post.image.is_empty() {
            article = article.child(
                Element::new("img")
                    .attr("src", post.image.as_str())
                    .attr("alt", "Post Cover image"),
            );
        }

        let upvote_class = if post.upvoted { "upvote active" } else { "upvote" };
        article.child(
            Element::new("footer")
                .child(
                    Element::new("span")
                        .attr("class", "source")
                        .text(post.source.name.as_str()),
                )
                .child(
                    Element::new("a")
                        .attr("href", post.comments_permalink.as_str())
                        .attr("class", "comments")
                        .text(format!("{} Comments", post.num_comments)),
                )
                .child(
                    Element::new("button")
                        .attr("class", upvote_class)
                        .attr("aria-pressed", post.upvoted.to_string())
                        .text(format!("{} Upvotes", post.num_upvotes)),
                ),
        )
    }

    fn render_ad(&self, ad: &Ad) -> Element {
        let promoted = match &ad.company {
            Some(company) => format!("Promoted by {company}"),
            None => format!("Promoted by {}", ad.source),
        };
        Element::new("article")
            .test_id(test_ids::AD_ITEM)
            .attr("class", "ad card")
            .child(
                Element::new("a")
                    .attr("href", ad.link.as_str())
                    .attr("target", "_blank")
                    .attr("rel", "noopener")
                    .child(Element::new("img").attr("src", ad.image.as_str()).attr("alt", "Ad"))
                    .child(Element::new("p").text(ad.description.as_str())),
            )
            .child(Element::new("span").attr("class", "promoted").text(promoted))
            .children(ad.pixel.iter().map(|src| {
                Element::new("img")
                    .attr("src", src.as_str())
                    .attr("class", "pixel")
                    .attr("alt", "")
            }))
    }

    /// The feed wrapped in the main layout: header, onboarding banner, feed.
    pub fn render_with_layout(&self) -> Element {
        let session = self.session();
        let theme = if session.settings.light_mode {
            "main-layout light"
        } else {
            "main-layout dark"
        };

        let account = match &session.user {
            Some(user) => Element::new("img")
                .test_id(test_ids::PROFILE_IMAGE)
                .attr("src", user.image.as_str())
                .attr("alt", format!("{}'s profile", user.username)),
            None => Element::new("button")
                .test_id(test_ids::LOGIN_BUTTON)
                .text("Login"),
        };

        let banner = session.onboarding.show_referral.then(|| {
            Element::new("aside")
                .test_id(test_ids::REFERRAL_BANNER)
                .text("Invite friends to join the discussion")
        });

        Element::new("div")
            .attr("class", theme)
            .child(
                Element::new("header")
                    .child(Element::new("h1").text(PAGE_TITLE))
                    .child(account),
            )
            .children(banner)
            .child(Element::new("main").child(self.render()))
    }

    pub fn render_html(&self) -> String {
        render_document(PAGE_TITLE, &self.render_with_layout())
    }
}
