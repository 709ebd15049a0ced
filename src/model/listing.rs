// src/model/listing.rs
//! Accumulated state of a paginated post listing.

use super::Post;
use crate::types::{PageCursor, Slug};
use indexmap::IndexMap;
use serde::Serialize;

/// An immutable snapshot of a listing.
///
/// Slugs are unique within `posts`. New snapshots are produced by
/// [`ListingState::appended`]; existing snapshots are never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingState {
    posts: Vec<Post>,
    cursor: Option<PageCursor>,
    current_page_number: u32,
}

impl ListingState {
    /// Creates the initial listing from the first page a source returned.
    ///
    /// Duplicate slugs keep their first occurrence. Page numbers below 1
    /// are clamped to 1.
    pub fn new(posts: Vec<Post>, cursor: Option<PageCursor>, page_number: u32) -> Self {
        let (posts, _) = merge_unique(Vec::new(), posts);
        Self {
            posts,
            cursor,
            current_page_number: page_number.max(1),
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref()
    }

    pub fn current_page_number(&self) -> u32 {
        self.current_page_number
    }

    pub fn has_next_page(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn contains_slug(&self, slug: &Slug) -> bool {
        self.posts.iter().any(|post| &post.slug == slug)
    }

    /// Returns a new snapshot with `page` appended after the existing posts.
    ///
    /// Posts whose slug is already present are dropped, so an overlapping
    /// page never produces duplicates. Also returns how many posts were
    /// actually added.
    pub fn appended(
        &self,
        page: Vec<Post>,
        cursor: Option<PageCursor>,
        page_number: u32,
    ) -> (Self, usize) {
        let before = self.posts.len();
        let (posts, duplicates) = merge_unique(self.posts.clone(), page);
        let added = posts.len() - before;
        if duplicates > 0 {
            log::debug!(
                "Page {} overlapped the listing: {} post(s) already present",
                page_number,
                duplicates
            );
        }

        (
            Self {
                posts,
                cursor,
                current_page_number: page_number.max(1),
            },
            added,
        )
    }
}

/// Appends `incoming` to `existing`, skipping slugs already seen.
///
/// Returns the merged posts and the number of rejected duplicates.
fn merge_unique(existing: Vec<Post>, incoming: Vec<Post>) -> (Vec<Post>, usize) {
    let mut by_slug: IndexMap<Slug, Post> = IndexMap::with_capacity(existing.len() + incoming.len());
    let mut duplicates = 0;

    for post in existing.into_iter().chain(incoming) {
        if by_slug.contains_key(&post.slug) {
            duplicates += 1;
            continue;
        }
        by_slug.insert(post.slug.clone(), post);
    }

    (by_slug.into_values().collect(), duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentId;
    use pretty_assertions::assert_eq;

    fn post(slug: &str, title: &str) -> Post {
        Post {
            id: DocumentId::new(format!("id-{}", slug)).unwrap(),
            slug: Slug::parse(slug).unwrap(),
            first_publication_date: None,
            last_publication_date: None,
            title: title.to_string(),
            subtitle: String::new(),
            author: String::new(),
            banner_url: None,
            content: Vec::new(),
        }
    }

    fn slugs(state: &ListingState) -> Vec<&str> {
        state.posts().iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_new_listing_dedupes_and_clamps_page() {
        let state = ListingState::new(vec![post("a", "A"), post("a", "A again")], None, 0);
        assert_eq!(slugs(&state), vec!["a"]);
        assert_eq!(state.posts()[0].title, "A");
        assert_eq!(state.current_page_number(), 1);
        assert!(!state.has_next_page());
    }

    #[test]
    fn test_appended_preserves_order_and_skips_overlap() {
        let first = ListingState::new(
            vec![post("a", "A"), post("b", "B")],
            PageCursor::from_token("page2"),
            1,
        );
        let (second, added) =
            first.appended(vec![post("b", "B"), post("c", "C"), post("a", "A")], None, 2);

        assert_eq!(slugs(&second), vec!["a", "b", "c"]);
        assert_eq!(added, 1);
        assert_eq!(second.current_page_number(), 2);
        assert!(!second.has_next_page());

        // The original snapshot is untouched.
        assert_eq!(slugs(&first), vec!["a", "b"]);
        assert!(first.has_next_page());
    }
}
