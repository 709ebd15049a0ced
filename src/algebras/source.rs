//! Content retrieval algebra for a headless CMS.
//!
//! This module defines the [`DocumentSource`] capability trait. The trait
//! covers paged queries, cursor continuation and slug lookup, without
//! implementation details like HTTP, API refs or access tokens.

use super::query::{DocumentQuery, Ordering};
use crate::error::AppError;
use crate::model::{RawDocument, RawPage};
use crate::types::{DocumentType, PageCursor, Slug};
use async_trait::async_trait;

/// Paged document retrieval.
///
/// This trait is **object-safe** and is used as `Arc<dyn DocumentSource>`.
///
/// # Laws
///
/// - **L1 (Cursor-Continuation)**: the cursor returned with page `n`
///   fetches page `n + 1` of the same query.
///   ```text
///   query_documents(q) == p1
///   fetch_page(p1.next_cursor()) == p2
///   assert_eq!(p2.page, p1.page + 1)
///   ```
///
/// - **L2 (Exhaustion)**: the last page of a query carries no cursor.
///
/// - **L3 (Slug-Identity)**: a document found by slug has that slug.
///   ```text
///   get_document_by_slug(t, s) == Some(d)
///   assert(d.uid == s || d.slugs.contains(s))
///   ```
///
/// Sources never normalize documents; they return them as the CMS did.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Runs a query and returns the requested page.
    async fn query_documents(&self, query: &DocumentQuery) -> Result<RawPage, AppError>;

    /// Fetches the page a previously returned cursor points at.
    ///
    /// Cursors not issued by this source fail with `AppError::InvalidCursor`.
    async fn fetch_page(&self, cursor: &PageCursor) -> Result<RawPage, AppError>;

    /// Looks up a single document by its routing slug.
    async fn get_document_by_slug(
        &self,
        document_type: &DocumentType,
        slug: &Slug,
    ) -> Result<Option<RawDocument>, AppError>;
}

/// Extension methods built from the [`DocumentSource`] base operations.
#[async_trait]
pub trait DocumentSourceExt: DocumentSource {
    /// Returns the single document adjacent to `document` in `ordering`.
    async fn neighbor_of(
        &self,
        document: &RawDocument,
        document_type: &DocumentType,
        ordering: Ordering,
        fetch_fields: &[&str],
    ) -> Result<Option<RawDocument>, AppError> {
        let id = crate::types::DocumentId::new(document.id.clone())?;
        let query = DocumentQuery::of_type(document_type)
            .with_fetch_fields(document_type, fetch_fields)
            .with_page_size(1)
            .ordered_by(ordering)
            .after(id);
        let page = self.query_documents(&query).await?;
        Ok(page.results.into_iter().next())
    }
}

#[async_trait]
impl<T: DocumentSource + ?Sized> DocumentSourceExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Source that answers every query with the same single-document page and
    /// remembers the last query it saw.
    struct RecordingSource {
        last_query: Mutex<Option<DocumentQuery>>,
    }

    #[async_trait]
    impl DocumentSource for RecordingSource {
        async fn query_documents(&self, query: &DocumentQuery) -> Result<RawPage, AppError> {
            *self.last_query.lock().unwrap() = Some(query.clone());
            Ok(serde_json::from_value(json!({
                "page": 1,
                "results": [{ "id": "next-id", "uid": "next-post" }],
                "next_page": null
            }))?)
        }

        async fn fetch_page(&self, cursor: &PageCursor) -> Result<RawPage, AppError> {
            Err(AppError::InvalidCursor(cursor.to_string()))
        }

        async fn get_document_by_slug(
            &self,
            _document_type: &DocumentType,
            _slug: &Slug,
        ) -> Result<Option<RawDocument>, AppError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn neighbor_query_uses_after_and_single_result() {
        let source = RecordingSource {
            last_query: Mutex::new(None),
        };
        let posts = DocumentType::new("posts").unwrap();
        let current = RawDocument {
            id: "current-id".to_string(),
            ..Default::default()
        };

        let neighbor = source
            .neighbor_of(&current, &posts, Ordering::first_published(), &["title"])
            .await
            .unwrap()
            .expect("neighbor should be returned");
        assert_eq!(neighbor.uid.as_deref(), Some("next-post"));

        let query = source.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.page_size, 1);
        assert_eq!(query.after.unwrap().as_str(), "current-id");
        assert_eq!(query.fetch_fields, vec!["posts.title".to_string()]);
        assert_eq!(query.orderings, vec![Ordering::first_published()]);
    }

    #[tokio::test]
    async fn neighbor_of_document_without_id_fails() {
        let source = RecordingSource {
            last_query: Mutex::new(None),
        };
        let posts = DocumentType::new("posts").unwrap();

        let result = source
            .neighbor_of(&RawDocument::default(), &posts, Ordering::latest_published(), &[])
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(source.last_query.lock().unwrap().is_none());
    }
}
