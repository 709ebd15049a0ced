// src/api/parser.rs
//! Turns raw HTTP responses into wire types.
//!
//! Status is checked before the body is decoded, so an error page is
//! reported as `SourceStatus` instead of a confusing JSON error.

use super::responses::{ApiInfo, ApiResponse};
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::AppError;
use crate::model::RawPage;

/// Parses any JSON response, mapping non-success statuses to errors.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if !result.status.is_success() {
        log::warn!(
            "HTTP {} from {}: {}",
            result.status,
            result.url,
            body_preview(&result.data)
        );
        return Err(AppError::SourceStatus {
            status: result.status,
            url: result.url,
        });
    }

    serde_json::from_str(&result.data).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", result.url, e);
        AppError::MalformedResponse(format!(
            "{} (from {}): {}",
            e,
            result.url,
            body_preview(&result.data)
        ))
    })
}

/// Parses a `/documents/search` response.
pub fn parse_search_response(result: ApiResponse<String>) -> Result<RawPage, AppError> {
    let page: RawPage = parse_api_response(result)?;
    log::debug!(
        "Search page {}/{}: {} result(s)",
        page.page,
        page.total_pages,
        page.results.len()
    );
    Ok(page)
}

/// Parses the repository root and extracts the master ref.
pub fn parse_master_ref(result: ApiResponse<String>) -> Result<String, AppError> {
    let info: ApiInfo = parse_api_response(result)?;
    info.master_ref().map(str::to_string).ok_or_else(|| {
        AppError::MalformedResponse("repository root lists no master ref".to_string())
    })
}

fn body_preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let preview: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", preview)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn response(status: StatusCode, body: &str) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status,
            url: "https://blog.cdn.prismic.io/api/v2/documents/search".to_string(),
        }
    }

    #[test]
    fn test_error_status_wins_over_body() {
        let result = parse_search_response(response(
            StatusCode::NOT_FOUND,
            r#"{"message":"Ref not found"}"#,
        ));
        match result {
            Err(AppError::SourceStatus { status, url }) => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert!(url.ends_with("/documents/search"));
            }
            other => panic!("Expected SourceStatus, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_body_is_malformed() {
        let result = parse_search_response(response(StatusCode::OK, r#"{"page":1,"results":[{"id"#));
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }

    #[test]
    fn test_search_response_parses() {
        let page = parse_search_response(response(
            StatusCode::OK,
            r#"{"page":1,"results_per_page":1,"total_pages":2,"next_page":"https://blog.cdn.prismic.io/api/v2/documents/search?page=2","results":[{"id":"YEk1","uid":"a","type":"posts","data":{}}]}"#,
        ))
        .unwrap();
        assert_eq!(page.results.len(), 1);
        assert!(page.next_cursor().is_some());
    }

    #[test]
    fn test_master_ref_required() {
        assert_eq!(
            parse_master_ref(response(
                StatusCode::OK,
                r#"{"refs":[{"ref":"abc","isMasterRef":true}]}"#
            ))
            .unwrap(),
            "abc"
        );
        assert!(parse_master_ref(response(StatusCode::OK, r#"{"refs":[]}"#)).is_err());
    }

    #[test]
    fn test_long_bodies_are_previewed() {
        let long = "x".repeat(ERROR_BODY_PREVIEW_LENGTH + 50);
        let preview = body_preview(&long);
        assert_eq!(preview.len(), ERROR_BODY_PREVIEW_LENGTH + 3);
        assert!(preview.ends_with("..."));
    }
}
