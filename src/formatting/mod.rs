// src/formatting/mod.rs
//! Pure text transformations: structured text, reading time and dates.

pub mod dates;
pub mod reading_time;
pub mod rich_text;

pub use dates::{parse_timestamp, DateFormatter, DisplayLocale};
pub use reading_time::ReadingTimeEstimator;
pub use rich_text::PrismicRichText;
