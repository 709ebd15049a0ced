// src/formatting/rich_text/mod.rs
//! Resolves Prismic structured text into plain text and HTML.
//!
//! Consecutive list items are grouped into a single `<ul>`/`<ol>`; every
//! other block maps to one element.

mod spans;

use crate::algebras::RichTextResolver;
use crate::model::{BlockKind, RichTextBlock, TextField};
use handlebars::html_escape;
use spans::render_inline;

/// The default [`RichTextResolver`] for Prismic structured text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrismicRichText;

impl RichTextResolver for PrismicRichText {
    fn resolve_to_plain_text(&self, field: &TextField) -> String {
        match field {
            TextField::Plain(text) => text.clone(),
            TextField::Rich(blocks) => rich_text_to_plain(blocks),
        }
    }

    fn resolve_to_html(&self, blocks: &[RichTextBlock]) -> String {
        rich_text_to_html(blocks)
    }
}

/// Joins the text of every block with single spaces.
pub fn rich_text_to_plain(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .map(|block| block.text.as_str())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders structured text to an HTML fragment.
pub fn rich_text_to_html(blocks: &[RichTextBlock]) -> String {
    let mut output = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let list_tag = match block.kind {
            BlockKind::ListItem => Some("ul"),
            BlockKind::OrderedListItem => Some("ol"),
            _ => None,
        };

        if open_list != list_tag {
            if let Some(tag) = open_list {
                output.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list_tag {
                output.push_str(&format!("<{}>", tag));
            }
            open_list = list_tag;
        }

        output.push_str(&render_block(block));
    }

    if let Some(tag) = open_list {
        output.push_str(&format!("</{}>", tag));
    }

    output
}

fn render_block(block: &RichTextBlock) -> String {
    let inline = || render_inline(&block.text, &block.spans);

    match block.kind {
        BlockKind::Paragraph => format!("<p>{}</p>", inline()),
        BlockKind::Heading1 => format!("<h1>{}</h1>", inline()),
        BlockKind::Heading2 => format!("<h2>{}</h2>", inline()),
        BlockKind::Heading3 => format!("<h3>{}</h3>", inline()),
        BlockKind::Heading4 => format!("<h4>{}</h4>", inline()),
        BlockKind::Heading5 => format!("<h5>{}</h5>", inline()),
        BlockKind::Heading6 => format!("<h6>{}</h6>", inline()),
        BlockKind::Preformatted => format!("<pre>{}</pre>", inline()),
        BlockKind::ListItem | BlockKind::OrderedListItem => format!("<li>{}</li>", inline()),
        BlockKind::Image => match &block.url {
            Some(url) => format!(
                "<p class=\"block-img\"><img src=\"{}\" alt=\"{}\" /></p>",
                html_escape(url),
                html_escape(block.alt.as_deref().unwrap_or_default())
            ),
            None => String::new(),
        },
        BlockKind::Embed => match &block.oembed {
            Some(embed) => format!(
                "<div data-oembed=\"{}\" data-oembed-type=\"{}\">{}</div>",
                html_escape(embed.embed_url.as_deref().unwrap_or_default()),
                html_escape(embed.embed_type.as_deref().unwrap_or_default()),
                // Provider markup is trusted CMS content.
                embed.html.as_deref().unwrap_or_default()
            ),
            None => String::new(),
        },
        BlockKind::Unknown => {
            log::debug!("Rendering unknown rich text block as a paragraph");
            format!("<p>{}</p>", inline())
        }
    }
}
