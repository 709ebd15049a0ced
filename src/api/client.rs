// src/api/client.rs
//! HTTP client for the Prismic REST API.
//!
//! Queries are pinned to the repository's master ref, which is resolved
//! from the API root once per client. Cursors handed out by this client
//! are the `next_page` URLs the search endpoint returns; only URLs on the
//! configured endpoint's origin are accepted back.

use super::parser::{parse_master_ref, parse_search_response};
use super::responses::ApiResponse;
use crate::algebras::{DocumentQuery, DocumentSource, Predicate};
use crate::constants::ACCESS_TOKEN_PARAM;
use crate::error::AppError;
use crate::model::{RawDocument, RawPage};
use crate::types::{
    without_access_token, AccessToken, DocumentType, PageCursor, Slug, ValidatedUrl,
};
use async_trait::async_trait;
use reqwest::{header, Client, Response};
use tokio::sync::OnceCell;
use url::Url;

/// A reqwest-backed [`DocumentSource`].
#[derive(Clone)]
pub struct PrismicHttpClient {
    client: Client,
    endpoint: ValidatedUrl,
    access_token: Option<AccessToken>,
    master_ref: OnceCell<String>,
}

impl PrismicHttpClient {
    /// Creates a client for the repository at `endpoint` (e.g. `https://blog.cdn.prismic.io/api/v2`).
    pub fn new(endpoint: ValidatedUrl, access_token: Option<AccessToken>) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers())
            .user_agent(concat!("prismic-blog/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            access_token,
            master_ref: OnceCell::new(),
        })
    }

    fn create_headers() -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers
    }

    pub fn endpoint(&self) -> &ValidatedUrl {
        &self.endpoint
    }

    /// Makes a GET request and captures the body with its metadata.
    async fn get(&self, url: Url) -> Result<ApiResponse<String>, AppError> {
        let display_url = redact(&url);
        log::debug!("GET {}", display_url);
        let response = self.client.get(url).send().await?;
        extract_response_text(response, display_url).await
    }

    /// The master ref, fetched from the API root on first use.
    async fn master_ref(&self) -> Result<&str, AppError> {
        let reference = self
            .master_ref
            .get_or_try_init(|| async {
                let mut url = self.endpoint.as_url().clone();
                self.authorize(&mut url);
                let reference = parse_master_ref(self.get(url).await?)?;
                log::info!("Querying content at master ref {}", reference);
                Ok::<_, AppError>(reference)
            })
            .await?;
        Ok(reference.as_str())
    }

    /// Builds the `/documents/search` URL for `query` at `reference`.
    fn search_url(&self, query: &DocumentQuery, reference: &str) -> Result<Url, AppError> {
        let mut url = self.endpoint.as_url().clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::MissingConfiguration(format!(
                    "API endpoint cannot carry a path: {}",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .extend(["documents", "search"]);

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("ref", reference);
            for (key, value) in query.to_query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        self.authorize(&mut url);
        Ok(url)
    }

    /// Adds the access token unless the URL already carries one.
    fn authorize(&self, url: &mut Url) {
        let Some(token) = &self.access_token else {
            return;
        };
        if url.query_pairs().any(|(key, _)| key == ACCESS_TOKEN_PARAM) {
            return;
        }
        url.query_pairs_mut()
            .append_pair(ACCESS_TOKEN_PARAM, token.as_str());
    }

    /// Resolves a cursor back into a URL on this client's origin.
    fn cursor_url(&self, cursor: &PageCursor) -> Result<Url, AppError> {
        let url = Url::parse(cursor.as_str())
            .map_err(|_| AppError::InvalidCursor(cursor.to_string()))?;
        if !self.endpoint.same_origin(&url) {
            return Err(AppError::InvalidCursor(redact(&url)));
        }
        Ok(url)
    }
}

impl std::fmt::Debug for PrismicHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrismicHttpClient")
            .field("endpoint", &self.endpoint)
            .field("access_token", &self.access_token)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DocumentSource for PrismicHttpClient {
    async fn query_documents(&self, query: &DocumentQuery) -> Result<RawPage, AppError> {
        let reference = self.master_ref().await?;
        let url = self.search_url(query, reference)?;
        parse_search_response(self.get(url).await?)
    }

    async fn fetch_page(&self, cursor: &PageCursor) -> Result<RawPage, AppError> {
        let mut url = self.cursor_url(cursor)?;
        self.authorize(&mut url);
        parse_search_response(self.get(url).await?)
    }

    async fn get_document_by_slug(
        &self,
        document_type: &DocumentType,
        slug: &Slug,
    ) -> Result<Option<RawDocument>, AppError> {
        let query = DocumentQuery::of_type(document_type)
            .with_predicate(Predicate::uid(document_type, slug))
            .with_page_size(1);
        let page = self.query_documents(&query).await?;
        Ok(page.results.into_iter().next())
    }
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(
    response: Response,
    url: String,
) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}

/// The URL with its access token removed, for logs and errors.
fn redact(url: &Url) -> String {
    without_access_token(url)
}
