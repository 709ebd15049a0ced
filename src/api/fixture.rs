// src/api/fixture.rs
//! An offline [`DocumentSource`] serving documents from memory.
//!
//! Executes the same query vocabulary as the search endpoint over a fixed
//! document set: `at` predicates on type, id and uid, one ordering on a
//! publication date, `after`, paging and field projection. Used for
//! offline builds and tests.

use crate::algebras::{DocumentQuery, DocumentSource, Predicate};
use crate::error::AppError;
use crate::formatting::parse_timestamp;
use crate::model::{RawDocument, RawPage};
use crate::types::{DocumentType, PageCursor, Slug};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::path::Path;

/// A fixture file: either a bare document list or a saved search response.
#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureFile {
    Page(RawPage),
    Documents(Vec<RawDocument>),
}

pub struct FixtureSource {
    documents: Vec<RawDocument>,
    /// Cursor token -> the query whose next page it names.
    issued: Mutex<HashMap<String, DocumentQuery>>,
}

impl FixtureSource {
    pub fn new(documents: Vec<RawDocument>) -> Self {
        Self {
            documents,
            issued: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let documents = match serde_json::from_str::<FixtureFile>(json)? {
            FixtureFile::Page(page) => page.results,
            FixtureFile::Documents(documents) => documents,
        };
        log::debug!("Loaded {} fixture document(s)", documents.len());
        Ok(Self::new(documents))
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn issue_cursor(&self, query: DocumentQuery) -> String {
        let mut issued = self.issued.lock();
        let token = format!("fixture-{}-page-{}", issued.len() + 1, query.page_index);
        issued.insert(token.clone(), query);
        token
    }

    fn run(&self, query: &DocumentQuery) -> Result<RawPage, AppError> {
        let mut matching = Vec::new();
        for document in &self.documents {
            if matches_all(document, &query.predicates)? {
                matching.push(document);
            }
        }

        if let Some(ordering) = query.orderings.first() {
            let key = timestamp_key(&ordering.field)?;
            matching.sort_by(|a, b| {
                let cmp = compare_timestamps(key(a), key(b));
                if ordering.descending {
                    cmp.reverse()
                } else {
                    cmp
                }
            });
        }

        if let Some(after) = &query.after {
            matching = match matching.iter().position(|d| d.id == after.as_str()) {
                Some(index) => matching.split_off(index + 1),
                None => Vec::new(),
            };
        }

        let page_size = query.page_size.max(1) as usize;
        let total = matching.len();
        let total_pages = total.div_ceil(page_size) as u32;
        let page_index = query.page_index.max(1);
        let start = (page_index as usize - 1) * page_size;

        let results: Vec<RawDocument> = matching
            .into_iter()
            .skip(start)
            .take(page_size)
            .map(|document| project(document, &query.fetch_fields))
            .collect();

        let next_page = (page_index < total_pages)
            .then(|| self.issue_cursor(query.clone().with_page(page_index + 1)));

        Ok(RawPage {
            page: page_index,
            results_per_page: page_size as u32,
            total_results_size: total as u32,
            total_pages,
            next_page,
            prev_page: None,
            results,
        })
    }
}

#[async_trait]
impl DocumentSource for FixtureSource {
    async fn query_documents(&self, query: &DocumentQuery) -> Result<RawPage, AppError> {
        self.run(query)
    }

    async fn fetch_page(&self, cursor: &PageCursor) -> Result<RawPage, AppError> {
        let query = self
            .issued
            .lock()
            .get(cursor.as_str())
            .cloned()
            .ok_or_else(|| AppError::InvalidCursor(cursor.to_string()))?;
        self.run(&query)
    }

    async fn get_document_by_slug(
        &self,
        document_type: &DocumentType,
        slug: &Slug,
    ) -> Result<Option<RawDocument>, AppError> {
        let query = DocumentQuery::of_type(document_type)
            .with_predicate(Predicate::uid(document_type, slug))
            .with_page_size(1);
        Ok(self.run(&query)?.results.into_iter().next())
    }
}

fn matches_all(document: &RawDocument, predicates: &[Predicate]) -> Result<bool, AppError> {
    for predicate in predicates {
        if !matches(document, predicate)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn matches(document: &RawDocument, predicate: &Predicate) -> Result<bool, AppError> {
    let Predicate::At { path, value } = predicate;
    match path.as_str() {
        "document.type" => Ok(document.document_type == *value),
        "document.id" => Ok(document.id == *value),
        uid_path => match uid_path
            .strip_prefix("my.")
            .and_then(|rest| rest.strip_suffix(".uid"))
        {
            Some(document_type) => Ok(document.document_type == document_type
                && document.uid.as_deref() == Some(value.as_str())),
            None => Err(AppError::MalformedResponse(format!(
                "fixture source does not support predicate path '{}'",
                path
            ))),
        },
    }
}

type TimestampKey = fn(&RawDocument) -> Option<&str>;

fn first_published(document: &RawDocument) -> Option<&str> {
    document.first_publication_date.as_deref()
}

fn last_published(document: &RawDocument) -> Option<&str> {
    document.last_publication_date.as_deref()
}

fn timestamp_key(field: &str) -> Result<TimestampKey, AppError> {
    match field {
        "document.first_publication_date" => Ok(first_published),
        "document.last_publication_date" => Ok(last_published),
        other => Err(AppError::MalformedResponse(format!(
            "fixture source cannot order by '{}'",
            other
        ))),
    }
}

/// Unparseable or missing timestamps sort after every real one.
fn compare_timestamps(a: Option<&str>, b: Option<&str>) -> CmpOrdering {
    let a = a.and_then(|ts| parse_timestamp(ts).ok());
    let b = b.and_then(|ts| parse_timestamp(ts).ok());
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        (None, None) => CmpOrdering::Equal,
    }
}

/// Keeps only the requested `type.field` entries of `data`.
fn project(document: &RawDocument, fetch_fields: &[String]) -> RawDocument {
    let mut projected = document.clone();
    if fetch_fields.is_empty() {
        return projected;
    }
    if let serde_json::Value::Object(data) = &mut projected.data {
        let prefix = format!("{}.", document.document_type);
        data.retain(|key, _| {
            fetch_fields
                .iter()
                .any(|field| field.strip_prefix(&prefix) == Some(key.as_str()))
        });
    }
    projected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebras::Ordering;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn posts() -> DocumentType {
        DocumentType::new("posts").unwrap()
    }

    fn source() -> FixtureSource {
        let documents = json!([
            { "id": "B", "uid": "segundo", "type": "posts",
              "first_publication_date": "2021-03-20T10:00:00+0000",
              "data": { "title": "Segundo", "content": [] } },
            { "id": "A", "uid": "primeiro", "type": "posts",
              "first_publication_date": "2021-03-15T10:00:00+0000",
              "data": { "title": "Primeiro", "content": [] } },
            { "id": "C", "uid": "terceiro", "type": "posts",
              "first_publication_date": "2021-03-25T10:00:00+0000",
              "data": { "title": "Terceiro", "content": [] } },
            { "id": "P", "uid": "sobre", "type": "page", "data": {} }
        ]);
        FixtureSource::from_json(&documents.to_string()).unwrap()
    }

    fn ids(page: &RawPage) -> Vec<&str> {
        page.results.iter().map(|d| d.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_paging_follows_issued_cursors() {
        let source = source();
        let query = DocumentQuery::of_type(&posts())
            .with_page_size(2)
            .ordered_by(Ordering::latest_published());

        let first = source.query_documents(&query).await.unwrap();
        assert_eq!(ids(&first), vec!["C", "B"]);
        assert_eq!(first.total_pages, 2);

        let second = source.fetch_page(&first.next_cursor().unwrap()).await.unwrap();
        assert_eq!(ids(&second), vec!["A"]);
        assert_eq!(second.page, 2);
        assert!(second.next_cursor().is_none());
    }

    #[tokio::test]
    async fn test_after_returns_neighbors() {
        let source = source();
        let base = DocumentQuery::of_type(&posts()).with_page_size(1);

        let next = source
            .query_documents(
                &base
                    .clone()
                    .ordered_by(Ordering::first_published())
                    .after(crate::types::DocumentId::new("B").unwrap()),
            )
            .await
            .unwrap();
        assert_eq!(ids(&next), vec!["C"]);

        let previous = source
            .query_documents(
                &base
                    .ordered_by(Ordering::latest_published())
                    .after(crate::types::DocumentId::new("A").unwrap()),
            )
            .await
            .unwrap();
        assert!(previous.results.is_empty());
    }

    #[tokio::test]
    async fn test_slug_lookup_and_projection() {
        let source = source();
        let found = source
            .get_document_by_slug(&posts(), &Slug::parse("primeiro").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, "A");
        assert!(source
            .get_document_by_slug(&posts(), &Slug::parse("sobre").unwrap())
            .await
            .unwrap()
            .is_none());

        let projected = source
            .query_documents(&DocumentQuery::of_type(&posts()).with_fetch_fields(&posts(), &["title"]))
            .await
            .unwrap();
        assert_eq!(projected.results[0].data, json!({ "title": "Segundo" }));
    }

    #[tokio::test]
    async fn test_unknown_cursor_is_rejected() {
        let result = source()
            .fetch_page(&PageCursor::from_token("fixture-99-page-2").unwrap())
            .await;
        assert!(matches!(result, Err(AppError::InvalidCursor(_))));
    }

    #[test]
    fn test_saved_search_response_is_accepted() {
        let source = FixtureSource::from_json(
            r#"{ "page": 1, "results": [{ "id": "A", "uid": "a", "type": "posts", "data": {} }] }"#,
        )
        .unwrap();
        assert_eq!(source.len(), 1);
    }
}
