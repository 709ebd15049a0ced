// src/api/simple_pagination.rs
//! Walks every page of a query by following cursors.

use crate::algebras::{DocumentQuery, DocumentSource};
use crate::error::AppError;
use crate::model::RawDocument;
use crate::types::PageCursor;
use std::collections::HashSet;

/// Documents collected from a multi-page walk.
#[derive(Debug, Default)]
pub struct PaginationResult {
    pub items: Vec<RawDocument>,
    pub pages_fetched: u32,
    /// True when the walk stopped at `max_pages` with pages left.
    pub truncated: bool,
}

/// Fetches all pages of `query`, up to `max_pages`.
///
/// Stops early if the source hands back a cursor it already issued.
pub async fn fetch_all_pages(
    source: &dyn DocumentSource,
    query: &DocumentQuery,
    max_pages: u32,
) -> Result<PaginationResult, AppError> {
    let mut result = PaginationResult::default();
    let mut seen: HashSet<PageCursor> = HashSet::new();

    let mut page = source.query_documents(query).await?;
    loop {
        result.pages_fetched += 1;
        let cursor = page.next_cursor();
        result.items.extend(page.results);

        let Some(cursor) = cursor else {
            break;
        };
        if result.pages_fetched >= max_pages {
            log::warn!("Reached maximum page limit: {}", max_pages);
            result.truncated = true;
            break;
        }
        if !seen.insert(cursor.clone()) {
            log::warn!("Source repeated cursor {}; stopping", cursor);
            break;
        }

        page = source.fetch_page(&cursor).await?;
    }

    log::debug!(
        "Fetched {} document(s) across {} page(s)",
        result.items.len(),
        result.pages_fetched
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixture::FixtureSource;
    use crate::types::DocumentType;
    use serde_json::json;

    fn source(count: usize) -> FixtureSource {
        let documents: Vec<serde_json::Value> = (0..count)
            .map(|i| json!({ "id": format!("D{}", i), "uid": format!("post-{}", i), "type": "posts", "data": {} }))
            .collect();
        FixtureSource::from_json(&serde_json::Value::Array(documents).to_string()).unwrap()
    }

    fn query() -> DocumentQuery {
        DocumentQuery::of_type(&DocumentType::new("posts").unwrap()).with_page_size(2)
    }

    #[tokio::test]
    async fn test_walks_every_page() {
        let result = fetch_all_pages(&source(5), &query(), 10).await.unwrap();
        assert_eq!(result.items.len(), 5);
        assert_eq!(result.pages_fetched, 3);
        assert!(!result.truncated);
    }

    #[tokio::test]
    async fn test_stops_at_page_limit() {
        let result = fetch_all_pages(&source(5), &query(), 2).await.unwrap();
        assert_eq!(result.items.len(), 4);
        assert!(result.truncated);
    }

    #[tokio::test]
    async fn test_empty_type_is_one_page() {
        let result = fetch_all_pages(&source(0), &query(), 10).await.unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.pages_fetched, 1);
    }
}
