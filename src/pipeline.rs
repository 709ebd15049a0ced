// src/pipeline.rs
//! Pipeline capability traits: the three stages of producing the blog.
//!
//! Each trait describes a single capability, so every stage can be tested
//! in isolation. [`BlogPipeline`] is the interpreter used by the binary.

use crate::constants::BUILD_CONCURRENCY;
use crate::error::AppError;
use crate::formatting::DateFormatter;
use crate::model::ListingState;
use crate::output::{
    deliver, fallback_output_path, index_output_path, post_output_path, OutputPlan, OutputReport,
};
use crate::render::{
    CommentSlot, CommentWidget, IndexView, Labels, PageRenderer, PostDetailView,
};
use crate::site::{BlogSite, FallbackPolicy, PostPage, StaticPaths};
use crate::types::{RenderedPage, Slug};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::Path;
use std::sync::Arc;

/// Retrieves blog content in page-sized units.
#[async_trait::async_trait]
pub trait SiteContent {
    /// The index after loading `pages` listing pages (at least one).
    async fn listing(&self, pages: u32) -> Result<Arc<ListingState>, AppError>;
    async fn post(&self, slug: &Slug) -> Result<Option<PostPage>, AppError>;
    async fn paths(&self) -> Result<StaticPaths, AppError>;
}

/// Turns loaded content into HTML pages.
pub trait PageComposer {
    fn compose_index(&self, listing: &ListingState) -> Result<RenderedPage, AppError>;
    fn compose_post(&self, page: &PostPage) -> Result<RenderedPage, AppError>;
    /// The page served for a post path that has not been rendered yet.
    fn compose_fallback(&self) -> Result<RenderedPage, AppError>;
}

/// Delivers planned output.
pub trait PageDelivery {
    fn deliver(&self, plan: OutputPlan) -> Result<OutputReport, AppError>;
}

/// Fetch, render and deliver the blog.
pub struct BlogPipeline {
    site: BlogSite,
    renderer: PageRenderer,
    dates: DateFormatter,
    comments: Option<Arc<dyn CommentWidget>>,
}

impl BlogPipeline {
    pub fn new(
        site: BlogSite,
        dates: DateFormatter,
        comments: Option<Arc<dyn CommentWidget>>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            site,
            renderer: PageRenderer::new()?,
            dates,
            comments,
        })
    }

    /// Renders one post, or `PostNotFound` if no post has `slug`.
    pub async fn render_post(&self, slug: &Slug) -> Result<RenderedPage, AppError> {
        let page = self
            .post(slug)
            .await?
            .ok_or_else(|| AppError::PostNotFound(slug.to_string()))?;
        self.compose_post(&page)
    }

    /// Plans the full static site under `out_dir`.
    ///
    /// Posts that cannot be normalized, that disappear between listing and
    /// loading, or whose load hits a transient source failure are left out
    /// of the plan; other failures abort. Skipped posts are still served
    /// through the fallback policy.
    pub async fn plan_site(&self, out_dir: &Path) -> Result<OutputPlan, AppError> {
        let listing = self.listing(1).await?;
        let mut plan = OutputPlan::new()
            .write_page(index_output_path(out_dir), self.compose_index(&listing)?);

        let paths = self.paths().await?;
        log::info!("Rendering {} post page(s)", paths.slugs.len());

        let pages: Vec<(Slug, Option<PostPage>)> = stream::iter(paths.slugs)
            .map(|slug| async move {
                match self.post(&slug).await {
                    Ok(page) => Ok((slug, page)),
                    Err(AppError::MalformedDocument { id, reason }) => {
                        log::warn!("Skipping post '{}' ({}): {}", slug, id, reason);
                        Ok((slug, None))
                    }
                    Err(e) if e.is_retryable() => {
                        log::warn!("Skipping post '{}' after transient failure: {}", slug, e);
                        Ok((slug, None))
                    }
                    Err(e) => Err(e),
                }
            })
            .buffered(BUILD_CONCURRENCY)
            .try_collect()
            .await?;

        for (slug, page) in pages {
            let Some(page) = page else {
                log::debug!("No page rendered for '{}'", slug);
                continue;
            };
            let path = post_output_path(out_dir, &slug)?;
            plan = plan.write_page(path, self.compose_post(&page)?);
        }

        if paths.fallback == FallbackPolicy::Placeholder {
            plan = plan.write_page(fallback_output_path(out_dir), self.compose_fallback()?);
        }

        Ok(plan)
    }
}

#[async_trait::async_trait]
impl SiteContent for BlogPipeline {
    async fn listing(&self, pages: u32) -> Result<Arc<ListingState>, AppError> {
        let controller = self.site.listing_controller().await?;
        let mut state = controller.snapshot().ok_or(AppError::NotInitialized)?;
        for _ in 1..pages.max(1) {
            if !controller.has_next_page() {
                break;
            }
            state = controller.fetch_next_page().await?;
        }
        log::info!(
            "Listing holds {} post(s) after page {}",
            state.len(),
            state.current_page_number()
        );
        Ok(state)
    }

    async fn post(&self, slug: &Slug) -> Result<Option<PostPage>, AppError> {
        self.site.load_post(slug).await
    }

    async fn paths(&self) -> Result<StaticPaths, AppError> {
        self.site.static_paths().await
    }
}

impl PageComposer for BlogPipeline {
    fn compose_index(&self, listing: &ListingState) -> Result<RenderedPage, AppError> {
        self.renderer
            .render_index(&IndexView::new(listing, &self.dates))
    }

    fn compose_post(&self, page: &PostPage) -> Result<RenderedPage, AppError> {
        let slot = CommentSlot::new(self.comments.clone());
        let comments_html = slot.mount(&page.post.slug).to_string();
        self.renderer
            .render_post(&PostDetailView::new(page, &self.dates, comments_html))
    }

    fn compose_fallback(&self) -> Result<RenderedPage, AppError> {
        self.renderer
            .render_loading(&Labels::for_locale(self.dates.locale()))
    }
}

impl PageDelivery for BlogPipeline {
    fn deliver(&self, plan: OutputPlan) -> Result<OutputReport, AppError> {
        deliver(plan).into_result()
    }
}
