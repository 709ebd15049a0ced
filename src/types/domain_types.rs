// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use crate::constants::ACCESS_TOKEN_PARAM;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Access token for private Prismic repositories.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token with validation
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();

        if token.trim().is_empty() {
            return Err(ValidationError::InvalidAccessToken {
                reason: "access token cannot be empty".to_string(),
            });
        }

        if token.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidAccessToken {
                reason: "access token cannot contain whitespace".to_string(),
            });
        }

        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.0.chars().take(6).collect();
        write!(f, "{}...", visible)
    }
}

// Never print tokens in debug logs either.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", self)
    }
}

/// Validated URL type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl(Url);

impl Serialize for ValidatedUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValidatedUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ValidatedUrl::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl ValidatedUrl {
    /// Create a new validated URL
    pub fn parse(url: &str) -> Result<Self, ValidationError> {
        match Url::parse(url) {
            Ok(parsed_url) => {
                if parsed_url.scheme() != "http" && parsed_url.scheme() != "https" {
                    return Err(ValidationError::InvalidUrl {
                        url: url.to_string(),
                        reason: "Only HTTP and HTTPS URLs are supported".to_string(),
                    });
                }
                Ok(Self(parsed_url))
            }
            Err(e) => Err(ValidationError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Whether `other` points at the same scheme, host and port.
    pub fn same_origin(&self, other: &Url) -> bool {
        self.0.origin() == other.origin()
    }
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where to resume a paged listing.
///
/// The token is opaque to everything except the source that issued it.
/// Absence of a cursor (`Option::None`) means there are no further pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    /// Creates a cursor from a source-issued token. Blank tokens mean "no cursor".
    pub fn from_token(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The token with any access token query parameter removed.
    ///
    /// Safe to log or publish in rendered pages. Tokens that are not URLs
    /// are returned unchanged.
    pub fn public_form(&self) -> String {
        match Url::parse(&self.0) {
            Ok(url) => without_access_token(&url),
            Err(_) => self.0.clone(),
        }
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.public_form())
    }
}

/// `url` as a string, minus its access token query parameter.
pub fn without_access_token(url: &Url) -> String {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != ACCESS_TOKEN_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut clean = url.clone();
    if kept.is_empty() {
        clean.set_query(None);
    } else {
        clean.query_pairs_mut().clear().extend_pairs(kept);
    }
    clean.to_string()
}

/// The final output of the render stage, a complete HTML page ready for delivery.
#[derive(Debug, Clone)]
pub struct RenderedPage(String);

impl RenderedPage {
    pub fn new(content: String) -> Self {
        Self(content)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RenderedPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_validation() {
        assert!(AccessToken::new("MC5ZRWsxeEJJQUFDUUFzS2o4").is_ok());
        assert!(AccessToken::new("").is_err());
        assert!(AccessToken::new("has space").is_err());
    }

    #[test]
    fn test_access_token_is_redacted() {
        let token = AccessToken::new("MC5ZRWsxeEJJQUFDUUFzS2o4").unwrap();
        assert_eq!(token.to_string(), "MC5ZRW...");
        assert!(!format!("{:?}", token).contains("QUFDUUFz"));
    }

    #[test]
    fn test_url_validation() {
        assert!(ValidatedUrl::parse("https://blog.cdn.prismic.io/api/v2").is_ok());
        assert!(ValidatedUrl::parse("http://localhost:8080").is_ok());
        assert!(ValidatedUrl::parse("ftp://example.com").is_err());
        assert!(ValidatedUrl::parse("not a url").is_err());
    }

    #[test]
    fn test_same_origin() {
        let endpoint = ValidatedUrl::parse("https://blog.cdn.prismic.io/api/v2").unwrap();
        let next = Url::parse("https://blog.cdn.prismic.io/api/v2/documents/search?page=2").unwrap();
        let other = Url::parse("https://evil.example.com/api/v2/documents/search").unwrap();
        assert!(endpoint.same_origin(&next));
        assert!(!endpoint.same_origin(&other));
    }

    #[test]
    fn test_cursor_public_form_drops_access_token() {
        let cursor = PageCursor::from_token(
            "https://blog.cdn.prismic.io/api/v2/documents/search?ref=X&page=2&access_token=SECRET",
        )
        .unwrap();
        assert_eq!(
            cursor.public_form(),
            "https://blog.cdn.prismic.io/api/v2/documents/search?ref=X&page=2"
        );
        assert!(!cursor.to_string().contains("SECRET"));
        assert!(cursor.as_str().contains("SECRET"));

        let opaque = PageCursor::from_token("fixture-1-page-2").unwrap();
        assert_eq!(opaque.public_form(), "fixture-1-page-2");
    }

    #[test]
    fn test_blank_cursor_is_none() {
        assert!(PageCursor::from_token("").is_none());
        assert!(PageCursor::from_token("  ").is_none());
        assert_eq!(PageCursor::from_token("page2").unwrap().as_str(), "page2");
    }
}
