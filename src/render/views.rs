// src/render/views.rs
//! View models: everything a template needs, already formatted.

use crate::constants::PUBLISHED_DATE_PATTERN;
use crate::formatting::{DateFormatter, DisplayLocale};
use crate::model::{ListingState, Post, PostLink};
use crate::site::PostPage;
use crate::types::PageCursor;
use serde::Serialize;

/// Fixed interface strings for one locale.
#[derive(Debug, Clone, Serialize)]
pub struct Labels {
    pub load_more: &'static str,
    pub next_post: &'static str,
    pub previous_post: &'static str,
    pub loading: &'static str,
    pub minutes: &'static str,
}

impl Labels {
    pub fn for_locale(locale: DisplayLocale) -> Self {
        match locale {
            DisplayLocale::PtBr => Self {
                load_more: "Carregar mais posts",
                next_post: "Próximo post",
                previous_post: "Post anterior",
                loading: "Carregando...",
                minutes: "min",
            },
            DisplayLocale::EnUs => Self {
                load_more: "Load more posts",
                next_post: "Next post",
                previous_post: "Previous post",
                loading: "Loading...",
                minutes: "min",
            },
        }
    }
}

/// One entry of the index.
#[derive(Debug, Clone, Serialize)]
pub struct PostCardView {
    pub href: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    /// Empty when the post has no usable publication date.
    pub published: String,
}

impl PostCardView {
    pub fn from_post(post: &Post, dates: &DateFormatter) -> Self {
        Self {
            href: post_href(post.slug.as_str()),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            published: dates.format_or_placeholder(
                post.first_publication_date.as_deref(),
                PUBLISHED_DATE_PATTERN,
            ),
        }
    }
}

/// The blog index page.
#[derive(Debug, Clone, Serialize)]
pub struct IndexView {
    pub lang: &'static str,
    pub posts: Vec<PostCardView>,
    /// Where the load-more button fetches from, without credentials;
    /// absent on the last page.
    pub next_page: Option<String>,
    pub labels: Labels,
}

impl IndexView {
    pub fn new(listing: &ListingState, dates: &DateFormatter) -> Self {
        Self {
            lang: dates.locale().tag(),
            posts: listing
                .posts()
                .iter()
                .map(|post| PostCardView::from_post(post, dates))
                .collect(),
            next_page: listing.cursor().map(PageCursor::public_form),
            labels: Labels::for_locale(dates.locale()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub heading: String,
    /// Trusted HTML produced by the rich-text resolver.
    pub body_html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavLinkView {
    pub href: String,
    pub title: String,
}

impl From<&PostLink> for NavLinkView {
    fn from(link: &PostLink) -> Self {
        Self {
            href: post_href(link.slug.as_str()),
            title: link.title.clone(),
        }
    }
}

/// A post detail page.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailView {
    pub lang: &'static str,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner_url: Option<String>,
    pub published: String,
    pub edited: Option<String>,
    pub reading_time: String,
    pub sections: Vec<SectionView>,
    pub previous: Option<NavLinkView>,
    pub next: Option<NavLinkView>,
    pub comments_html: String,
    pub labels: Labels,
}

impl PostDetailView {
    pub fn new(page: &PostPage, dates: &DateFormatter, comments_html: String) -> Self {
        let post = &page.post;
        let labels = Labels::for_locale(dates.locale());

        let edited = post.last_publication_date.as_deref().and_then(|timestamp| {
            dates
                .format_edited(timestamp)
                .map_err(|e| log::warn!("Omitting edited date for {}: {}", post.slug, e))
                .ok()
        });

        Self {
            lang: dates.locale().tag(),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            banner_url: post.banner_url.clone(),
            published: dates.format_or_placeholder(
                post.first_publication_date.as_deref(),
                PUBLISHED_DATE_PATTERN,
            ),
            edited,
            reading_time: format!("{} {}", page.reading_minutes, labels.minutes),
            sections: post
                .content
                .iter()
                .map(|block| SectionView {
                    heading: block.heading.clone(),
                    body_html: block.body_html.clone(),
                })
                .collect(),
            previous: page.navigation.previous.as_ref().map(NavLinkView::from),
            next: page.navigation.next.as_ref().map(NavLinkView::from),
            comments_html,
            labels,
        }
    }
}

/// Site-relative URL of a post page.
pub fn post_href(slug: &str) -> String {
    format!("/post/{}", slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentBlock, Navigation};
    use crate::types::{DocumentId, Slug};
    use pretty_assertions::assert_eq;

    fn post(first: Option<&str>, last: Option<&str>) -> Post {
        Post {
            id: DocumentId::new("YEk1").unwrap(),
            slug: Slug::parse("como-utilizar-hooks").unwrap(),
            first_publication_date: first.map(str::to_string),
            last_publication_date: last.map(str::to_string),
            title: "Como utilizar Hooks".to_string(),
            subtitle: "Pensando em sincronização".to_string(),
            author: "Joseph Oliveira".to_string(),
            banner_url: None,
            content: vec![ContentBlock {
                heading: "Proin".to_string(),
                body_html: "<p>texto</p>".to_string(),
            }],
        }
    }

    #[test]
    fn test_card_formats_publication_date() {
        let card = PostCardView::from_post(
            &post(Some("2021-03-15T19:25:28+0000"), None),
            &DateFormatter::default(),
        );
        assert_eq!(card.href, "/post/como-utilizar-hooks");
        assert_eq!(card.published, "15 mar 2021");
    }

    #[test]
    fn test_card_with_bad_date_renders_placeholder() {
        let card = PostCardView::from_post(&post(Some("ontem"), None), &DateFormatter::default());
        assert_eq!(card.published, "");
        assert_eq!(card.title, "Como utilizar Hooks");
    }

    #[test]
    fn test_index_exposes_next_page_only_with_cursor() {
        let dates = DateFormatter::default();
        let more = ListingState::new(
            vec![post(None, None)],
            PageCursor::from_token("https://blog.cdn.prismic.io/api/v2/documents/search?page=2"),
            1,
        );
        assert!(IndexView::new(&more, &dates).next_page.is_some());

        let last = ListingState::new(vec![post(None, None)], None, 1);
        let view = IndexView::new(&last, &dates);
        assert!(view.next_page.is_none());
        assert_eq!(view.labels.load_more, "Carregar mais posts");
    }

    #[test]
    fn test_detail_view() {
        let page = PostPage {
            post: post(
                Some("2021-03-15T19:25:28+0000"),
                Some("2021-03-25T19:27:35+0000"),
            ),
            reading_minutes: 4,
            navigation: Navigation {
                previous: None,
                next: Some(PostLink {
                    slug: Slug::parse("criando-um-app").unwrap(),
                    title: "Criando um app".to_string(),
                }),
            },
        };

        let view = PostDetailView::new(&page, &DateFormatter::default(), String::new());
        assert_eq!(view.published, "15 mar 2021");
        assert_eq!(view.edited.as_deref(), Some("editado em 25 mar 2021, às 19:27"));
        assert_eq!(view.reading_time, "4 min");
        assert_eq!(view.next.unwrap().href, "/post/criando-um-app");
        assert!(view.previous.is_none());
        assert_eq!(view.lang, "pt-BR");
    }
}
