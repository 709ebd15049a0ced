// src/normalizer.rs
//! Conversion of raw CMS documents into [`Post`] records.
//!
//! Normalization is a pure function of the raw document: the same input
//! always yields the same post, and nothing outside the document is read.
//! Required fields (`title`, `content`, an id and a slug) must be present
//! and well-typed; optional fields degrade to empty values.

use crate::algebras::RichTextResolver;
use crate::error::AppError;
use crate::formatting::PrismicRichText;
use crate::model::{
    ContentBlock, ImageField, Post, PostLink, RawContentBlock, RawDocument, TextField,
};
use crate::types::{DocumentId, Slug};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Placeholder id used in errors for documents that have none.
const UNKNOWN_DOCUMENT_ID: &str = "<unknown>";

/// A document left out of a normalized page, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub id: String,
    pub reason: String,
}

/// Result of normalizing a whole page of documents.
#[derive(Debug, Clone, Default)]
pub struct NormalizedPage {
    /// Successfully normalized posts, in source order.
    pub posts: Vec<Post>,
    pub skipped: Vec<SkippedDocument>,
}

/// Turns raw documents into posts using a rich-text resolver.
#[derive(Clone)]
pub struct ContentNormalizer {
    resolver: Arc<dyn RichTextResolver>,
}

impl Default for ContentNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(PrismicRichText))
    }
}

impl std::fmt::Debug for ContentNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentNormalizer").finish_non_exhaustive()
    }
}

impl ContentNormalizer {
    pub fn new(resolver: Arc<dyn RichTextResolver>) -> Self {
        Self { resolver }
    }

    /// Normalizes one document.
    ///
    /// Fails with [`AppError::MalformedDocument`] when the id, slug, `title`
    /// or `content` is missing or mistyped.
    pub fn normalize(&self, document: &RawDocument) -> Result<Post, AppError> {
        let (id, slug) = identity(document)?;

        let title = self.required_text(document, "title")?;
        let content = self.content_blocks(document)?;

        Ok(Post {
            id,
            slug,
            first_publication_date: document.first_publication_date.clone(),
            last_publication_date: document.last_publication_date.clone(),
            title,
            subtitle: self.optional_text(document, "subtitle"),
            author: self.optional_text(document, "author"),
            banner_url: banner_url(document),
            content,
        })
    }

    /// Normalizes a page, skipping documents that fail.
    pub fn normalize_page(&self, documents: &[RawDocument]) -> NormalizedPage {
        let mut page = NormalizedPage {
            posts: Vec::with_capacity(documents.len()),
            skipped: Vec::new(),
        };

        for document in documents {
            match self.normalize(document) {
                Ok(post) => page.posts.push(post),
                Err(e) => {
                    log::warn!("Skipping document: {}", e);
                    let (id, reason) = match e {
                        AppError::MalformedDocument { id, reason } => (id, reason),
                        other => (display_id(document).to_string(), other.to_string()),
                    };
                    page.skipped.push(SkippedDocument { id, reason });
                }
            }
        }

        page
    }

    /// The slug and title of a document, enough to link to it.
    pub fn link(&self, document: &RawDocument) -> Result<PostLink, AppError> {
        let (_, slug) = identity(document)?;
        let title = self.required_text(document, "title")?;
        Ok(PostLink { slug, title })
    }

    fn required_text(&self, document: &RawDocument, name: &str) -> Result<String, AppError> {
        let value = document.field(name).ok_or_else(|| {
            AppError::malformed_document(
                display_id(document),
                format!("missing required field '{}'", name),
            )
        })?;
        let field: TextField = decode(value).map_err(|reason| {
            AppError::malformed_document(
                display_id(document),
                format!("field '{}' is not text: {}", name, reason),
            )
        })?;
        Ok(self.resolver.resolve_to_plain_text(&field))
    }

    fn optional_text(&self, document: &RawDocument, name: &str) -> String {
        let Some(value) = document.field(name) else {
            return String::new();
        };
        match decode::<TextField>(value) {
            Ok(field) => self.resolver.resolve_to_plain_text(&field),
            Err(reason) => {
                log::debug!(
                    "Ignoring mistyped field '{}' on {}: {}",
                    name,
                    display_id(document),
                    reason
                );
                String::new()
            }
        }
    }

    fn content_blocks(&self, document: &RawDocument) -> Result<Vec<ContentBlock>, AppError> {
        let value = document.field("content").ok_or_else(|| {
            AppError::malformed_document(display_id(document), "missing required field 'content'")
        })?;
        let raw_blocks: Vec<RawContentBlock> = decode(value).map_err(|reason| {
            AppError::malformed_document(
                display_id(document),
                format!("field 'content' is not a list of sections: {}", reason),
            )
        })?;

        Ok(raw_blocks
            .iter()
            .map(|block| ContentBlock {
                heading: block
                    .heading
                    .as_ref()
                    .map(|heading| self.resolver.resolve_to_plain_text(heading))
                    .unwrap_or_default(),
                body_html: block
                    .body
                    .as_deref()
                    .map(|body| self.resolver.resolve_to_html(body))
                    .unwrap_or_default(),
            })
            .collect())
    }
}

/// The routing slug of a document: `uid` first, then the first legacy slug.
pub fn document_slug(document: &RawDocument) -> Result<Slug, AppError> {
    identity(document).map(|(_, slug)| slug)
}

fn identity(document: &RawDocument) -> Result<(DocumentId, Slug), AppError> {
    let id = DocumentId::new(document.id.clone())
        .map_err(|_| AppError::malformed_document(UNKNOWN_DOCUMENT_ID, "document has no id"))?;

    let candidate = document
        .uid
        .as_deref()
        .filter(|uid| !uid.trim().is_empty())
        .or_else(|| document.slugs.first().map(String::as_str))
        .ok_or_else(|| AppError::malformed_document(id.as_str(), "document has no uid or slug"))?;

    let slug = Slug::parse(candidate)
        .map_err(|e| AppError::malformed_document(id.as_str(), e.to_string()))?;

    Ok((id, slug))
}

fn banner_url(document: &RawDocument) -> Option<String> {
    let value = document.field("banner")?;
    match decode::<ImageField>(value) {
        Ok(image) => image.url.filter(|url| !url.trim().is_empty()),
        Err(reason) => {
            log::debug!("Ignoring mistyped banner on {}: {}", display_id(document), reason);
            None
        }
    }
}

fn decode<T: DeserializeOwned>(value: &serde_json::Value) -> Result<T, String> {
    T::deserialize(value).map_err(|e| e.to_string())
}

fn display_id(document: &RawDocument) -> &str {
    if document.id.trim().is_empty() {
        UNKNOWN_DOCUMENT_ID
    } else {
        &document.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn document(value: serde_json::Value) -> RawDocument {
        serde_json::from_value(value).unwrap()
    }

    fn full_document() -> RawDocument {
        document(json!({
            "id": "YEk1",
            "uid": "como-utilizar-hooks",
            "type": "posts",
            "first_publication_date": "2021-03-15T19:25:28+0000",
            "last_publication_date": "2021-03-25T19:27:35+0000",
            "data": {
                "title": [{ "type": "heading1", "text": "Como utilizar Hooks", "spans": [] }],
                "subtitle": "Pensando em sincronização em vez de ciclos de vida",
                "author": [{ "type": "paragraph", "text": "Joseph Oliveira", "spans": [] }],
                "banner": { "url": "https://images.prismic.io/criando-projeto/hooks.png", "alt": null },
                "content": [
                    {
                        "heading": "Proin et varius",
                        "body": [
                            { "type": "paragraph", "text": "Nullam dolor sapien", "spans": [
                                { "start": 0, "end": 6, "type": "strong" }
                            ] }
                        ]
                    },
                    {
                        "heading": [{ "type": "heading2", "text": "Cras laoreet", "spans": [] }],
                        "body": []
                    }
                ]
            }
        }))
    }

    #[test]
    fn test_normalizes_full_document() {
        let post = ContentNormalizer::default().normalize(&full_document()).unwrap();

        assert_eq!(post.id.as_str(), "YEk1");
        assert_eq!(post.slug.as_str(), "como-utilizar-hooks");
        assert_eq!(post.title, "Como utilizar Hooks");
        assert_eq!(post.subtitle, "Pensando em sincronização em vez de ciclos de vida");
        assert_eq!(post.author, "Joseph Oliveira");
        assert_eq!(
            post.banner_url.as_deref(),
            Some("https://images.prismic.io/criando-projeto/hooks.png")
        );
        assert_eq!(
            post.first_publication_date.as_deref(),
            Some("2021-03-15T19:25:28+0000")
        );
        assert_eq!(
            post.content,
            vec![
                ContentBlock {
                    heading: "Proin et varius".to_string(),
                    body_html: "<p><strong>Nullam</strong> dolor sapien</p>".to_string(),
                },
                ContentBlock {
                    heading: "Cras laoreet".to_string(),
                    body_html: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_missing_optional_fields_are_empty() {
        let post = ContentNormalizer::default()
            .normalize(&document(json!({
                "id": "YEk2",
                "uid": "minimo",
                "data": { "title": "Mínimo", "content": [], "banner": {}, "author": 42 }
            })))
            .unwrap();

        assert_eq!(post.subtitle, "");
        assert_eq!(post.author, "");
        assert_eq!(post.banner_url, None);
        assert!(post.content.is_empty());
        assert_eq!(post.first_publication_date, None);
    }

    #[test]
    fn test_missing_required_fields_fail() {
        let normalizer = ContentNormalizer::default();

        let no_content = document(json!({ "id": "A1", "uid": "a", "data": { "title": "A" } }));
        match normalizer.normalize(&no_content) {
            Err(AppError::MalformedDocument { id, reason }) => {
                assert_eq!(id, "A1");
                assert!(reason.contains("content"));
            }
            other => panic!("Expected malformed document, got {:?}", other),
        }

        let bad_title = document(json!({
            "id": "A2", "uid": "b", "data": { "title": { "not": "text" }, "content": [] }
        }));
        assert!(matches!(
            normalizer.normalize(&bad_title),
            Err(AppError::MalformedDocument { .. })
        ));

        let no_slug = document(json!({ "id": "A3", "data": { "title": "C", "content": [] } }));
        assert!(matches!(
            normalizer.normalize(&no_slug),
            Err(AppError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_slug_falls_back_to_legacy_slugs() {
        let post = ContentNormalizer::default()
            .normalize(&document(json!({
                "id": "A4",
                "slugs": ["primeiro-post", "old-name"],
                "data": { "title": "Primeiro", "content": [] }
            })))
            .unwrap();
        assert_eq!(post.slug.as_str(), "primeiro-post");
    }

    #[test]
    fn test_page_skips_only_malformed_documents() {
        let documents = vec![
            full_document(),
            document(json!({ "id": "BAD", "uid": "quebrado", "data": { "title": "Sem conteúdo" } })),
            document(json!({ "id": "OK2", "uid": "segundo", "data": { "title": "Segundo", "content": [] } })),
        ];

        let page = ContentNormalizer::default().normalize_page(&documents);

        let slugs: Vec<&str> = page.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["como-utilizar-hooks", "segundo"]);
        assert_eq!(page.skipped.len(), 1);
        assert_eq!(page.skipped[0].id, "BAD");
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let normalizer = ContentNormalizer::default();
        let doc = full_document();
        assert_eq!(normalizer.normalize(&doc).unwrap(), normalizer.normalize(&doc).unwrap());
    }

    #[test]
    fn test_link_needs_only_title_and_slug() {
        let link = ContentNormalizer::default()
            .link(&document(json!({
                "id": "N1",
                "uid": "proximo",
                "data": { "title": [{ "type": "heading1", "text": "Próximo", "spans": [] }] }
            })))
            .unwrap();
        assert_eq!(link.slug.as_str(), "proximo");
        assert_eq!(link.title, "Próximo");
    }
}
