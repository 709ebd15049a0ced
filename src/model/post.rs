// src/model/post.rs
//! The canonical post record every presentation layer consumes.

use crate::types::{DocumentId, Slug};
use serde::{Deserialize, Serialize};

/// A blog post after normalization.
///
/// Publication timestamps are kept exactly as the CMS reported them;
/// they are parsed only when formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: DocumentId,
    pub slug: Slug,
    pub first_publication_date: Option<String>,
    pub last_publication_date: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner_url: Option<String>,
    pub content: Vec<ContentBlock>,
}

/// A titled section of a post body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub heading: String,
    pub body_html: String,
}

/// A minimal reference to another post, used for previous/next links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostLink {
    pub slug: Slug,
    pub title: String,
}

/// Links to the chronologically adjacent posts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Navigation {
    /// The post published just before this one.
    pub previous: Option<PostLink>,
    /// The post published just after this one.
    pub next: Option<PostLink>,
}
