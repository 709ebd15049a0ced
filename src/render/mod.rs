// src/render/mod.rs
//! Presentation: view models, page templates and embedded widgets.

pub mod comments;
pub mod templates;
pub mod views;

pub use comments::{CommentSlot, CommentWidget, UtterancesWidget};
pub use templates::PageRenderer;
pub use views::{IndexView, Labels, PostCardView, PostDetailView};
