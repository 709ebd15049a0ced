use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Routing slugs: lowercase words joined by hyphens or underscores.
static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{Ll}\p{Lo}0-9]+(?:[-_.][\p{Ll}\p{Lo}0-9]+)*$")
        .expect("Failed to compile slug regex - this is a bug in the code")
});

static DOCUMENT_TYPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9_-]*$")
        .expect("Failed to compile document type regex - this is a bug in the code")
});

/// Opaque document identifier assigned by the CMS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wraps a CMS identifier. The value is opaque, only emptiness is rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidId(
                "document ID cannot be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable unique identifier used for routing (`/post/{slug}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Parses a slug, trimming surrounding whitespace.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim().trim_matches('/');

        if cleaned.is_empty() {
            return Err(ValidationError::InvalidSlug {
                slug: input.to_string(),
                reason: "slug cannot be empty".to_string(),
            });
        }

        if !SLUG_REGEX.is_match(cleaned) {
            return Err(ValidationError::InvalidSlug {
                slug: input.to_string(),
                reason: "only lowercase letters, digits, '-', '_' and '.' are allowed"
                    .to_string(),
            });
        }

        Ok(Self(cleaned.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for Slug {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Slug {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Slug::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Custom type of a CMS document (e.g. `posts`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentType(String);

impl DocumentType {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if !DOCUMENT_TYPE_REGEX.is_match(&name) {
            return Err(ValidationError::InvalidDocumentType(name));
        }
        Ok(Self(name))
    }

    /// The custom type blog posts are stored under.
    pub fn posts() -> Self {
        Self(crate::constants::POST_DOCUMENT_TYPE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of this type's `uid` field, as used by query predicates.
    pub fn uid_path(&self) -> String {
        format!("my.{}.uid", self.0)
    }

    /// Path of one of this type's data fields, as used by `fetch`.
    pub fn field_path(&self, field: &str) -> String {
        format!("{}.{}", self.0, field)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
