//! Capability algebras for prismic-blog.
//!
//! This module defines traits that represent **capabilities**, not
//! implementations. The pagination and normalization core depends only on
//! these traits; the HTTP client and the Prismic rich-text renderer are
//! interpreters plugged in at the edges.
//!
//! # Capability Traits
//!
//! - [`DocumentSource`] — paged document retrieval from the CMS
//! - [`RichTextResolver`] — structured text to plain text / HTML
//!
//! # Laws
//!
//! Each trait documents laws that all implementations must satisfy.

pub mod query;
pub mod rich_text;
pub mod source;

pub use query::{DocumentQuery, Ordering, Predicate};
pub use rich_text::RichTextResolver;
pub use source::{DocumentSource, DocumentSourceExt};
