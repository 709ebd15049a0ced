// src/site.rs
//! The blog as the pages see it: the first listing page, post details with
//! navigation, and the set of paths to pre-render.

use crate::algebras::{DocumentQuery, DocumentSource, DocumentSourceExt, Ordering};
use crate::api::fetch_all_pages;
use crate::constants::{
    DEFAULT_LISTING_PAGE_SIZE, DEFAULT_REVALIDATE_SECS, POST_FETCH_FIELDS, PRISMIC_MAX_PAGE_SIZE,
    STATIC_PATHS_MAX_PAGES,
};
use crate::error::AppError;
use crate::formatting::ReadingTimeEstimator;
use crate::model::{ListingState, Navigation, Post, PostLink, RawDocument};
use crate::normalizer::{document_slug, ContentNormalizer};
use crate::pagination::PaginationController;
use crate::types::{DocumentType, Slug, ValidationError};
use indexmap::IndexSet;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// What happens when a post path was not pre-rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Render on first request, then serve the result.
    #[default]
    Blocking,
    /// Serve a loading placeholder while the page renders.
    Placeholder,
    /// Unknown paths are not found.
    Disabled,
}

impl FallbackPolicy {
    pub fn serves_unknown_paths(&self) -> bool {
        !matches!(self, FallbackPolicy::Disabled)
    }
}

impl FromStr for FallbackPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blocking" => Ok(FallbackPolicy::Blocking),
            "placeholder" | "true" => Ok(FallbackPolicy::Placeholder),
            "disabled" | "false" => Ok(FallbackPolicy::Disabled),
            _ => Err(ValidationError::UnknownOption {
                option: "fallback policy",
                value: s.to_string(),
                expected: "blocking, placeholder, disabled",
            }),
        }
    }
}

/// How pre-rendered pages are regenerated and what unknown paths do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StaticGenerationPolicy {
    pub revalidate_interval_secs: u64,
    pub fallback: FallbackPolicy,
}

impl Default for StaticGenerationPolicy {
    fn default() -> Self {
        Self {
            revalidate_interval_secs: DEFAULT_REVALIDATE_SECS,
            fallback: FallbackPolicy::default(),
        }
    }
}

impl StaticGenerationPolicy {
    pub fn revalidate_after(&self) -> Duration {
        Duration::from_secs(self.revalidate_interval_secs)
    }
}

/// Pre-renderable post paths plus the policy for everything else.
#[derive(Debug, Clone, Serialize)]
pub struct StaticPaths {
    pub slugs: Vec<Slug>,
    pub fallback: FallbackPolicy,
    pub revalidate_interval_secs: u64,
}

/// A post ready for its detail page.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub post: Post,
    pub reading_minutes: u32,
    pub navigation: Navigation,
}

/// Tunables for a [`BlogSite`].
#[derive(Debug, Clone)]
pub struct SiteOptions {
    pub document_type: DocumentType,
    pub page_size: u32,
    pub reading_time: ReadingTimeEstimator,
    pub static_generation: StaticGenerationPolicy,
    pub max_static_pages: u32,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            document_type: DocumentType::posts(),
            page_size: DEFAULT_LISTING_PAGE_SIZE,
            reading_time: ReadingTimeEstimator::default(),
            static_generation: StaticGenerationPolicy::default(),
            max_static_pages: STATIC_PATHS_MAX_PAGES,
        }
    }
}

/// Entry point for everything the index and post pages need.
pub struct BlogSite {
    source: Arc<dyn DocumentSource>,
    normalizer: ContentNormalizer,
    options: SiteOptions,
}

impl BlogSite {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        normalizer: ContentNormalizer,
        options: SiteOptions,
    ) -> Self {
        Self {
            source,
            normalizer,
            options,
        }
    }

    pub fn options(&self) -> &SiteOptions {
        &self.options
    }

    /// Newest posts first, one listing page.
    fn listing_query(&self) -> DocumentQuery {
        let document_type = &self.options.document_type;
        DocumentQuery::of_type(document_type)
            .with_fetch_fields(document_type, POST_FETCH_FIELDS)
            .with_page_size(self.options.page_size)
            .ordered_by(Ordering::latest_published())
    }

    /// Fetches and normalizes the first page of the index.
    pub async fn first_listing(&self) -> Result<ListingState, AppError> {
        let page = self.source.query_documents(&self.listing_query()).await?;
        let normalized = self.normalizer.normalize_page(&page.results);
        log::info!(
            "First listing page: {} post(s), {} skipped, more pages: {}",
            normalized.posts.len(),
            normalized.skipped.len(),
            page.next_page.is_some()
        );
        Ok(ListingState::new(
            normalized.posts,
            page.next_cursor(),
            page.page,
        ))
    }

    /// A pagination controller initialized with the first listing page.
    pub async fn listing_controller(&self) -> Result<PaginationController, AppError> {
        let controller =
            PaginationController::new(Arc::clone(&self.source), self.normalizer.clone());
        controller.initialize(self.first_listing().await?)?;
        Ok(controller)
    }

    /// Loads one post with reading time and navigation. `Ok(None)` if no post has `slug`.
    pub async fn load_post(&self, slug: &Slug) -> Result<Option<PostPage>, AppError> {
        let document_type = &self.options.document_type;
        let Some(document) = self
            .source
            .get_document_by_slug(document_type, slug)
            .await?
        else {
            log::info!("No post found for slug '{}'", slug);
            return Ok(None);
        };

        let post = self.normalizer.normalize(&document)?;

        // A failed neighbor lookup costs a link, never the post.
        let (next, previous) = futures::join!(
            self.source
                .neighbor_of(&document, document_type, Ordering::first_published(), &["title"]),
            self.source
                .neighbor_of(&document, document_type, Ordering::latest_published(), &["title"]),
        );

        let navigation = Navigation {
            previous: self.navigation_link(previous),
            next: self.navigation_link(next),
        };
        let reading_minutes = self.options.reading_time.estimate(&post);

        Ok(Some(PostPage {
            post,
            reading_minutes,
            navigation,
        }))
    }

    fn navigation_link(
        &self,
        neighbor: Result<Option<RawDocument>, AppError>,
    ) -> Option<PostLink> {
        let neighbor = match neighbor {
            Ok(neighbor) => neighbor?,
            Err(e) => {
                log::warn!("Neighbor lookup failed, omitting navigation link: {}", e);
                return None;
            }
        };
        match self.normalizer.link(&neighbor) {
            Ok(link) => Some(link),
            Err(e) => {
                log::warn!("Dropping navigation link: {}", e);
                None
            }
        }
    }

    /// Every post slug, walking all pages of the post type.
    pub async fn static_paths(&self) -> Result<StaticPaths, AppError> {
        let document_type = &self.options.document_type;
        let query = DocumentQuery::of_type(document_type)
            .with_fetch_fields(document_type, &["title"])
            .with_page_size(PRISMIC_MAX_PAGE_SIZE)
            .ordered_by(Ordering::latest_published());

        let walked =
            fetch_all_pages(self.source.as_ref(), &query, self.options.max_static_pages).await?;
        if walked.truncated {
            log::warn!(
                "Static paths truncated after {} page(s); remaining posts render on demand",
                walked.pages_fetched
            );
        }

        let mut slugs = IndexSet::with_capacity(walked.items.len());
        for document in &walked.items {
            match document_slug(document) {
                Ok(slug) => {
                    slugs.insert(slug);
                }
                Err(e) => log::warn!("Skipping path: {}", e),
            }
        }

        let policy = self.options.static_generation;
        Ok(StaticPaths {
            slugs: slugs.into_iter().collect(),
            fallback: policy.fallback,
            revalidate_interval_secs: policy.revalidate_interval_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FixtureSource;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn post(id: &str, uid: &str, published: &str) -> serde_json::Value {
        json!({
            "id": id,
            "uid": uid,
            "type": "posts",
            "first_publication_date": published,
            "last_publication_date": published,
            "data": {
                "title": uid.replace('-', " "),
                "author": "Joseph Oliveira",
                "content": [{ "heading": "Intro", "body": [
                    { "type": "paragraph", "text": "um dois três", "spans": [] }
                ] }]
            }
        })
    }

    fn site(page_size: u32) -> BlogSite {
        let documents = json!([
            post("A", "primeiro-post", "2021-03-10T10:00:00+0000"),
            post("B", "segundo-post", "2021-03-15T10:00:00+0000"),
            post("C", "terceiro-post", "2021-03-20T10:00:00+0000"),
            { "id": "X", "uid": "quebrado", "type": "posts",
              "first_publication_date": "2021-03-25T10:00:00+0000",
              "data": { "title": "Sem conteúdo" } }
        ]);
        let source = FixtureSource::from_json(&documents.to_string()).unwrap();
        BlogSite::new(
            Arc::new(source),
            ContentNormalizer::default(),
            SiteOptions {
                page_size,
                ..SiteOptions::default()
            },
        )
    }

    /// Serves posts normally but fails every neighbor query.
    struct NeighborlessSource(FixtureSource);

    #[async_trait::async_trait]
    impl DocumentSource for NeighborlessSource {
        async fn query_documents(
            &self,
            query: &DocumentQuery,
        ) -> Result<crate::model::RawPage, AppError> {
            if query.after.is_some() {
                return Err(AppError::MalformedResponse("neighbor query 503".to_string()));
            }
            self.0.query_documents(query).await
        }

        async fn fetch_page(
            &self,
            cursor: &crate::types::PageCursor,
        ) -> Result<crate::model::RawPage, AppError> {
            self.0.fetch_page(cursor).await
        }

        async fn get_document_by_slug(
            &self,
            document_type: &DocumentType,
            slug: &Slug,
        ) -> Result<Option<RawDocument>, AppError> {
            self.0.get_document_by_slug(document_type, slug).await
        }
    }

    fn slugs(state: &ListingState) -> Vec<&str> {
        state.posts().iter().map(|p| p.slug.as_str()).collect()
    }

    #[tokio::test]
    async fn test_first_listing_is_newest_first_and_skips_malformed() {
        let listing = site(2).first_listing().await.unwrap();
        assert_eq!(slugs(&listing), vec!["terceiro-post"]);
        assert!(listing.has_next_page());
        assert_eq!(listing.current_page_number(), 1);
    }

    #[tokio::test]
    async fn test_controller_loads_remaining_pages() {
        let controller = site(2).listing_controller().await.unwrap();
        let state = controller.fetch_next_page().await.unwrap();
        assert_eq!(
            slugs(&state),
            vec!["terceiro-post", "segundo-post", "primeiro-post"]
        );
        assert!(!state.has_next_page());
        assert_eq!(state.current_page_number(), 2);
    }

    #[tokio::test]
    async fn test_post_page_has_navigation_and_reading_time() {
        let page = site(5)
            .load_post(&Slug::parse("segundo-post").unwrap())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(page.post.title, "segundo post");
        assert_eq!(page.reading_minutes, 1);
        assert_eq!(
            page.navigation.next.map(|l| l.slug.to_string()),
            Some("terceiro-post".to_string())
        );
        assert_eq!(
            page.navigation.previous.map(|l| l.slug.to_string()),
            Some("primeiro-post".to_string())
        );
    }

    #[tokio::test]
    async fn test_post_survives_failed_neighbor_lookups() {
        let documents = json!([
            post("A", "primeiro-post", "2021-03-10T10:00:00+0000"),
            post("B", "segundo-post", "2021-03-15T10:00:00+0000"),
        ]);
        let source = NeighborlessSource(FixtureSource::from_json(&documents.to_string()).unwrap());
        let site = BlogSite::new(
            Arc::new(source),
            ContentNormalizer::default(),
            SiteOptions::default(),
        );

        let page = site
            .load_post(&Slug::parse("segundo-post").unwrap())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(page.post.title, "segundo post");
        assert_eq!(page.navigation, Navigation::default());
    }

    #[tokio::test]
    async fn test_oldest_post_has_no_previous() {
        let page = site(5)
            .load_post(&Slug::parse("primeiro-post").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(page.navigation.previous.is_none());
        assert!(page.navigation.next.is_some());
    }

    #[tokio::test]
    async fn test_unknown_slug_is_none() {
        let page = site(5)
            .load_post(&Slug::parse("nao-existe").unwrap())
            .await
            .unwrap();
        assert!(page.is_none());
    }

    #[tokio::test]
    async fn test_static_paths_cover_every_post() {
        let paths = site(1).static_paths().await.unwrap();
        let slugs: Vec<&str> = paths.slugs.iter().map(Slug::as_str).collect();
        assert_eq!(
            slugs,
            vec!["quebrado", "terceiro-post", "segundo-post", "primeiro-post"]
        );
        assert_eq!(paths.fallback, FallbackPolicy::Blocking);
        assert_eq!(paths.revalidate_interval_secs, 3600);
    }

    #[test]
    fn test_fallback_parsing() {
        assert_eq!("blocking".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Blocking);
        assert_eq!("false".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Disabled);
        assert!(!FallbackPolicy::Disabled.serves_unknown_paths());
        assert!("sometimes".parse::<FallbackPolicy>().is_err());
    }
}
