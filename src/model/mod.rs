mod listing;
mod post;
pub mod raw;

pub use listing::ListingState;
pub use post::{ContentBlock, Navigation, Post, PostLink};
pub use raw::{
    BlockKind, EmbedData, ImageField, RawContentBlock, RawDocument, RawPage, RichTextBlock, Span,
    SpanData, SpanKind, TextField,
};
