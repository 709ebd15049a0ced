// src/api/mod.rs
//! CMS interaction: interpreters of the [`DocumentSource`](crate::algebras::DocumentSource) algebra.
//!
//! The HTTP client talks to a Prismic repository; the fixture source
//! serves a saved document set offline. Parsing lives apart from I/O.

pub mod client;
pub mod fixture;
pub mod parser;
pub mod responses;
pub mod simple_pagination;

pub use client::PrismicHttpClient;
pub use fixture::FixtureSource;
pub use responses::ApiResponse;
pub use simple_pagination::{fetch_all_pages, PaginationResult};
