// src/output/paths.rs
//! Where rendered pages land inside an output directory.
//!
//! Pure path arithmetic; nothing here touches the filesystem.

use crate::error::AppError;
use crate::types::Slug;
use std::path::{Component, Path, PathBuf};

const PAGE_FILE_NAME: &str = "index.html";
const POST_DIR: &str = "post";
const FALLBACK_DIR: &str = "_fallback";

/// `<out>/index.html`
pub fn index_output_path(out_dir: &Path) -> PathBuf {
    out_dir.join(PAGE_FILE_NAME)
}

/// `<out>/post/<slug>/index.html`, refusing paths that escape `out_dir`.
pub fn post_output_path(out_dir: &Path, slug: &Slug) -> Result<PathBuf, AppError> {
    let segment = sanitize_segment(slug.as_str());
    let path = out_dir.join(POST_DIR).join(&segment).join(PAGE_FILE_NAME);
    if !is_within(&path, out_dir) {
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("post path escapes output directory: {}", path.display()),
        )));
    }
    Ok(path)
}

/// `<out>/post/_fallback/index.html`, the placeholder for unknown posts.
pub fn fallback_output_path(out_dir: &Path) -> PathBuf {
    out_dir.join(POST_DIR).join(FALLBACK_DIR).join(PAGE_FILE_NAME)
}

/// Replaces characters that are unsafe in a single path segment.
fn sanitize_segment(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let safe = safe.trim().trim_matches('.');
    if safe.is_empty() {
        "unnamed".to_string()
    } else {
        safe.to_string()
    }
}

/// Whether `path`, after resolving `.` and `..`, stays under `base`.
fn is_within(path: &Path, base: &Path) -> bool {
    normalize_path(path).starts_with(normalize_path(base))
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                components.pop();
            }
            Component::CurDir => {}
            c => components.push(c),
        }
    }
    components.into_iter().collect()
}
