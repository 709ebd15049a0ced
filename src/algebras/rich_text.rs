//! Rich-text resolution algebra.

use crate::model::{RichTextBlock, TextField};

/// Resolves structured text fields into display strings.
///
/// # Laws
///
/// - **L1 (Purity)**: resolving the same field twice yields the same string.
/// - **L2 (Plain passthrough)**: `resolve_to_plain_text(TextField::Plain(s)) == s`.
/// - **L3 (Empty)**: an empty block list resolves to an empty string in both forms.
pub trait RichTextResolver: Send + Sync {
    /// Flattens a field to plain text, dropping all formatting.
    fn resolve_to_plain_text(&self, field: &TextField) -> String;

    /// Renders structured text blocks to an HTML fragment.
    fn resolve_to_html(&self, blocks: &[RichTextBlock]) -> String;
}
