// src/lib.rs
//! prismic-blog library: a paginated blog index and post pages rendered
//! from a Prismic repository.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `ValidationError`
//! - **Configuration** — `CommandLineInput`, `SiteConfig`
//! - **Domain model** — `RawDocument`, `Post`, `ListingState`, `Navigation`
//! - **Domain types** — `DocumentId`, `Slug`, `PageCursor`, `AccessToken`, etc.
//! - **Content sources** — `PrismicHttpClient`, `FixtureSource`
//! - **Core** — `ContentNormalizer`, `PaginationController`, `BlogSite`
//! - **Formatting** — `DateFormatter`, `ReadingTimeEstimator`, `PrismicRichText`
//! - **Presentation** — `PageRenderer`, view models, comment widgets

mod algebras;
mod api;
mod config;
mod constants;
mod error;
mod formatting;
mod model;
mod normalizer;
mod output;
mod pagination;
mod pipeline;
mod render;
mod site;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{
    Command, CommandLineInput, SiteConfig, SourceConfig, ACCESS_TOKEN_ENV, ENDPOINT_ENV,
};

// --- Domain Model ---
pub use crate::model::{
    BlockKind, ContentBlock, ImageField, ListingState, Navigation, Post, PostLink,
    RawContentBlock, RawDocument, RawPage, RichTextBlock, Span, SpanKind, TextField,
};

// --- Domain Types ---
pub use crate::types::{
    AccessToken, DocumentId, DocumentType, PageCursor, RenderedPage, Slug, ValidatedUrl,
};

// --- Content Sources ---
pub use crate::api::{fetch_all_pages, FixtureSource, PaginationResult, PrismicHttpClient};

// --- Core ---
pub use crate::normalizer::{document_slug, ContentNormalizer, NormalizedPage, SkippedDocument};
pub use crate::pagination::{FetchPhase, PaginationController};
pub use crate::site::{
    BlogSite, FallbackPolicy, PostPage, SiteOptions, StaticGenerationPolicy, StaticPaths,
};

// --- Formatting ---
pub use crate::formatting::{
    parse_timestamp, DateFormatter, DisplayLocale, PrismicRichText, ReadingTimeEstimator,
};

// --- Presentation ---
pub use crate::render::{
    CommentSlot, CommentWidget, IndexView, Labels, PageRenderer, PostCardView, PostDetailView,
    UtterancesWidget,
};

// --- Output ---
pub use crate::output::{deliver, DeliveryTarget, OutputPlan, OutputReport};

// --- Pipeline Traits ---
pub use crate::pipeline::{BlogPipeline, PageComposer, PageDelivery, SiteContent};

// --- Algebras (Capability Traits) ---
pub use crate::algebras::{
    DocumentQuery, DocumentSource, DocumentSourceExt, Ordering, Predicate, RichTextResolver,
};
