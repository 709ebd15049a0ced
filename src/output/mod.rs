// src/output/mod.rs
//! Output handling with planning separated from execution.
//!
//! Commands build an [`OutputPlan`] with pure functions; [`deliver`]
//! performs the I/O and reports per-operation outcomes.

mod paths;
mod types;
mod writer;

pub use paths::{fallback_output_path, index_output_path, post_output_path};
pub use types::{DeliveryTarget, OutputPlan, OutputReport};
pub use writer::deliver;
