// src/render/comments.rs
//! Third-party comment threads on post pages.
//!
//! Mounting a widget is a side effect outside the content pipeline: the
//! post is rendered the same way whether or not a widget is configured.

use crate::types::Slug;
use handlebars::html_escape;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const UTTERANCES_CLIENT: &str = "https://utteranc.es/client.js";

/// Something that can embed a comment thread for a post.
pub trait CommentWidget: Send + Sync {
    /// Markup that loads the thread for `slug`.
    fn embed_markup(&self, slug: &Slug) -> String;
}

/// GitHub-issue backed comments via utterances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtterancesWidget {
    /// `owner/name` of the repository holding the issues.
    pub repo: String,
    pub issue_term: String,
    pub theme: String,
}

impl UtterancesWidget {
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            issue_term: "pathname".to_string(),
            theme: "github-dark".to_string(),
        }
    }
}

impl CommentWidget for UtterancesWidget {
    fn embed_markup(&self, _slug: &Slug) -> String {
        format!(
            "<script src=\"{}\" repo=\"{}\" issue-term=\"{}\" theme=\"{}\" crossorigin=\"anonymous\" async></script>",
            UTTERANCES_CLIENT,
            html_escape(&self.repo),
            html_escape(&self.issue_term),
            html_escape(&self.theme)
        )
    }
}

/// The comment area of one post page. The widget is mounted at most once.
pub struct CommentSlot {
    widget: Option<Arc<dyn CommentWidget>>,
    mounted: OnceCell<String>,
}

impl CommentSlot {
    pub fn new(widget: Option<Arc<dyn CommentWidget>>) -> Self {
        Self {
            widget,
            mounted: OnceCell::new(),
        }
    }

    /// Mounts the widget for `slug` and returns its markup.
    ///
    /// Later calls return the first mount's markup unchanged. Without a
    /// widget the slot stays empty.
    pub fn mount(&self, slug: &Slug) -> &str {
        self.mounted.get_or_init(|| match &self.widget {
            Some(widget) => {
                log::debug!("Mounting comments for {}", slug);
                widget.embed_markup(slug)
            }
            None => String::new(),
        })
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get().is_some()
    }
}
