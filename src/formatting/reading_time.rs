// src/formatting/reading_time.rs
//! Estimated reading time for a post.

use crate::constants::WORDS_PER_MINUTE;
use crate::model::Post;
use crate::types::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

// Span-level tags sit inside running text, so they vanish without a gap.
static INLINE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:a|abbr|b|code|em|i|mark|s|small|span|strong|sub|sup|u)(?:\s[^>]*)?/?>")
        .expect("Failed to compile inline markup regex - this is a bug in the code")
});

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]*>").expect("Failed to compile markup regex - this is a bug in the code")
});

/// Estimates whole minutes of reading from a post's headings and bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingTimeEstimator {
    words_per_minute: u32,
}

impl Default for ReadingTimeEstimator {
    fn default() -> Self {
        Self {
            words_per_minute: WORDS_PER_MINUTE,
        }
    }
}

impl ReadingTimeEstimator {
    pub fn new(words_per_minute: u32) -> Result<Self, ValidationError> {
        if words_per_minute == 0 {
            return Err(ValidationError::OutOfBounds {
                value: 0,
                min: 1,
                max: u32::MAX,
            });
        }
        Ok(Self { words_per_minute })
    }

    pub fn words_per_minute(&self) -> u32 {
        self.words_per_minute
    }

    /// Minutes needed to read `post`, rounded up; 0 for a post with no words.
    pub fn estimate(&self, post: &Post) -> u32 {
        let words = count_words(post);
        let words = u32::try_from(words).unwrap_or(u32::MAX);
        words.div_ceil(self.words_per_minute)
    }
}

/// Words in every heading plus every body with markup stripped.
pub fn count_words(post: &Post) -> usize {
    post.content
        .iter()
        .map(|block| word_count(&block.heading) + word_count(&strip_markup(&block.body_html)))
        .sum()
}

/// Removes markup: inline tags are dropped in place, block tags become
/// spaces so adjacent paragraphs and list items don't merge words.
pub fn strip_markup(html: &str) -> String {
    let text = INLINE_TAG.replace_all(html, "");
    MARKUP_TAG.replace_all(&text, " ").into_owned()
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentBlock;
    use crate::types::{DocumentId, Slug};
    use pretty_assertions::assert_eq;

    fn post_with(blocks: Vec<(&str, String)>) -> Post {
        Post {
            id: DocumentId::new("id").unwrap(),
            slug: Slug::parse("post").unwrap(),
            first_publication_date: None,
            last_publication_date: None,
            title: "Title words are not counted".to_string(),
            subtitle: String::new(),
            author: String::new(),
            banner_url: None,
            content: blocks
                .into_iter()
                .map(|(heading, body_html)| ContentBlock {
                    heading: heading.to_string(),
                    body_html,
                })
                .collect(),
        }
    }

    fn words(n: usize) -> String {
        format!("<p>{}</p>", vec!["palavra"; n].join(" "))
    }

    #[test]
    fn test_zero_words_is_zero_minutes() {
        let estimator = ReadingTimeEstimator::default();
        assert_eq!(estimator.estimate(&post_with(vec![])), 0);
        assert_eq!(
            estimator.estimate(&post_with(vec![("", "<p></p><br />".to_string())])),
            0
        );
    }

    #[test]
    fn test_boundaries_at_two_hundred_words() {
        let estimator = ReadingTimeEstimator::default();
        assert_eq!(estimator.estimate(&post_with(vec![("", words(1))])), 1);
        assert_eq!(estimator.estimate(&post_with(vec![("", words(200))])), 1);
        assert_eq!(estimator.estimate(&post_with(vec![("", words(201))])), 2);
    }

    #[test]
    fn test_headings_count_and_markup_does_not() {
        let post = post_with(vec![
            ("Proin et varius", "<p><strong>um</strong><em>dois</em></p>".to_string()),
            (
                "Cras laoreet",
                "<p class=\"block-img\"><img src=\"x.png\" alt=\"a b c\" /></p>".to_string(),
            ),
        ]);
        assert_eq!(count_words(&post), 3 + 1 + 2);
    }

    #[test]
    fn test_inline_spans_do_not_split_words() {
        assert_eq!(
            strip_markup("<p><strong>Hook</strong>s and <a href=\"https://x.dev\">re</a>act</p>").trim(),
            "Hooks and react"
        );
        assert_eq!(strip_markup("<li>um</li><li>dois</li>").split_whitespace().count(), 2);

        let body = "<p><strong>Hook</strong>s</p>".repeat(150);
        let post = post_with(vec![("", body)]);
        assert_eq!(count_words(&post), 150);
        assert_eq!(ReadingTimeEstimator::default().estimate(&post), 1);
    }

    #[test]
    fn test_custom_speed() {
        let estimator = ReadingTimeEstimator::new(100).unwrap();
        assert_eq!(estimator.estimate(&post_with(vec![("", words(150))])), 2);
        assert!(ReadingTimeEstimator::new(0).is_err());
    }
}
