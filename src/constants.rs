// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

// ---------------------------------------------------------------------------
// Content source boundaries
// ---------------------------------------------------------------------------

/// Query parameter carrying the access token of a private repository.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Largest page the search endpoint will return.
pub const PRISMIC_MAX_PAGE_SIZE: u32 = 100;

/// Posts per page on the blog index when nothing else is configured.
pub const DEFAULT_LISTING_PAGE_SIZE: u32 = 5;

/// Custom type holding blog posts.
pub const POST_DOCUMENT_TYPE: &str = "posts";

/// Upper bound on pages walked when enumerating every slug for pre-rendering.
///
/// At the maximum page size this covers 10 000 documents.
pub const STATIC_PATHS_MAX_PAGES: u32 = 100;

/// Data fields requested for listing and detail queries.
pub const POST_FETCH_FIELDS: &[&str] = &["title", "subtitle", "author", "banner", "content"];

// ---------------------------------------------------------------------------
// Formatting boundaries
// ---------------------------------------------------------------------------

/// Average adult silent reading speed used for reading-time estimates.
pub const WORDS_PER_MINUTE: u32 = 200;

/// Pattern for the publication date shown on cards and post headers.
pub const PUBLISHED_DATE_PATTERN: &str = "dd MMM yyyy";

// ---------------------------------------------------------------------------
// Static generation
// ---------------------------------------------------------------------------

/// How long a pre-rendered page is served before it is regenerated.
pub const DEFAULT_REVALIDATE_SECS: u64 = 60 * 60;

/// Post pages loaded concurrently during a full site build.
pub const BUILD_CONCURRENCY: usize = 4;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
