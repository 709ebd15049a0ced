//! Query vocabulary understood by every [`DocumentSource`](super::DocumentSource).
//!
//! Queries are plain data. Sources decide how to execute them; the HTTP
//! source turns them into search-endpoint parameters via
//! [`DocumentQuery::to_query_pairs`].

use crate::constants::{DEFAULT_LISTING_PAGE_SIZE, PRISMIC_MAX_PAGE_SIZE};
use crate::types::{DocumentId, DocumentType, Slug};

/// A filter over documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `path` equals `value` exactly.
    At { path: String, value: String },
}

impl Predicate {
    pub fn at(path: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::At {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Matches documents of the given custom type.
    pub fn document_type(document_type: &DocumentType) -> Self {
        Self::at("document.type", document_type.as_str())
    }

    /// Matches the document of `document_type` whose uid is `slug`.
    pub fn uid(document_type: &DocumentType, slug: &Slug) -> Self {
        Self::at(document_type.uid_path(), slug.as_str())
    }

    /// Renders the predicate in the search endpoint's syntax.
    pub fn to_query_string(&self) -> String {
        match self {
            Predicate::At { path, value } => {
                format!("[at({}, \"{}\")]", path, value.replace('"', "\\\""))
            }
        }
    }
}

/// Sort key for query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub field: String,
    pub descending: bool,
}

impl Ordering {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    /// Oldest first by original publication.
    pub fn first_published() -> Self {
        Self::ascending("document.first_publication_date")
    }

    /// Newest first by original publication.
    pub fn latest_published() -> Self {
        Self::descending("document.first_publication_date")
    }

    fn to_query_string(&self) -> String {
        if self.descending {
            format!("{} desc", self.field)
        } else {
            self.field.clone()
        }
    }
}

/// A paged document query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentQuery {
    pub predicates: Vec<Predicate>,
    /// Fully qualified data fields to return (e.g. `posts.title`). Empty means all.
    pub fetch_fields: Vec<String>,
    pub page_size: u32,
    /// 1-based page index.
    pub page_index: u32,
    pub orderings: Vec<Ordering>,
    /// Only return documents that come after this one in `orderings`.
    pub after: Option<DocumentId>,
}

impl DocumentQuery {
    /// All documents of one custom type, first page, default page size.
    pub fn of_type(document_type: &DocumentType) -> Self {
        Self {
            predicates: vec![Predicate::document_type(document_type)],
            fetch_fields: Vec::new(),
            page_size: DEFAULT_LISTING_PAGE_SIZE,
            page_index: 1,
            orderings: Vec::new(),
            after: None,
        }
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Page size is clamped to `1..=PRISMIC_MAX_PAGE_SIZE`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, PRISMIC_MAX_PAGE_SIZE);
        self
    }

    pub fn with_page(mut self, page_index: u32) -> Self {
        self.page_index = page_index.max(1);
        self
    }

    pub fn with_fetch_fields(mut self, document_type: &DocumentType, fields: &[&str]) -> Self {
        self.fetch_fields = fields
            .iter()
            .map(|field| document_type.field_path(field))
            .collect();
        self
    }

    pub fn ordered_by(mut self, ordering: Ordering) -> Self {
        self.orderings.push(ordering);
        self
    }

    pub fn after(mut self, id: DocumentId) -> Self {
        self.after = Some(id);
        self
    }

    /// The query as search-endpoint URL parameters (ref and token excluded).
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if !self.predicates.is_empty() {
            let joined: String = self
                .predicates
                .iter()
                .map(Predicate::to_query_string)
                .collect();
            pairs.push(("q", format!("[{}]", joined)));
        }

        pairs.push(("pageSize", self.page_size.to_string()));
        pairs.push(("page", self.page_index.to_string()));

        if !self.orderings.is_empty() {
            let joined = self
                .orderings
                .iter()
                .map(Ordering::to_query_string)
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("orderings", format!("[{}]", joined)));
        }

        if !self.fetch_fields.is_empty() {
            pairs.push(("fetch", self.fetch_fields.join(",")));
        }

        if let Some(after) = &self.after {
            pairs.push(("after", after.as_str().to_string()));
        }

        pairs
    }
}
