use shelf_kernel::settings::GoogleBooksSettings;
use thiserror::Error;

use super::models::{SearchOutcome, VolumesResponse};

const ERROR_EXCERPT_CHARS: usize = 100;
const FETCH_FAILED: &str = "Failed to fetch books. Please try again later.";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Google Books API error: {status} - {excerpt}...")]
    Status { status: u16, excerpt: String },

    #[error("Google Books request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SearchError {
    /// Message shown on the search page
    pub fn user_message(&self) -> String {
        match self {
            SearchError::Status { .. } => self.to_string(),
            SearchError::Transport(_) => FETCH_FAILED.to_string(),
        }
    }
}

/// Client for the Google Books `volumes` endpoint.
///
/// Every search is a single round trip: no retries, no caching.
#[derive(Debug, Clone)]
pub struct BookSearch {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_results: u32,
}

impl BookSearch {
    pub fn new(settings: &GoogleBooksSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/volumes", settings.base_url.trim_end_matches('/')),
            api_key: settings.api_key.clone(),
            max_results: settings.max_results,
        }
    }

    /// Search for `query`. An empty query returns no books without calling out;
    /// failures come back as an empty result carrying a message.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        if query.is_empty() {
            tracing::debug!("empty search query, skipping Google Books");
            return SearchOutcome::empty("");
        }

        match self.fetch(query).await {
            Ok(response) => {
                let books = response.into_books();
                if books.is_empty() {
                    tracing::info!(query, "no books found");
                } else {
                    tracing::info!(query, found = books.len(), "books found");
                }
                SearchOutcome {
                    books,
                    query: query.to_string(),
                    error: None,
                }
            }
            Err(error) => {
                tracing::error!(query, %error, "Google Books search failed");
                SearchOutcome::failed(query, error.user_message())
            }
        }
    }

    async fn fetch(&self, query: &str) -> Result<VolumesResponse, SearchError> {
        tracing::info!(endpoint = %self.endpoint, query, "querying Google Books");

        let max_results = self.max_results.to_string();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("key", self.api_key.as_str()),
                ("maxResults", max_results.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                excerpt: body.chars().take(ERROR_EXCERPT_CHARS).collect(),
            });
        }

        Ok(response.json::<VolumesResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::UNKNOWN_AUTHORS;
    use axum::{extract::Query, http::StatusCode, routing::get, Router};
    use std::collections::HashMap;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    #[derive(Default)]
    struct MockApi {
        hits: AtomicUsize,
        last_query: Mutex<HashMap<String, String>>,
    }

    /// Serve `body` with `status` from `/volumes` on an ephemeral port.
    async fn mock_api(status: StatusCode, body: impl Into<String>) -> (BookSearch, Arc<MockApi>) {
        let body: String = body.into();
        let api = Arc::new(MockApi::default());
        let handler_api = api.clone();
        let app = Router::new().route(
            "/volumes",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let api = handler_api.clone();
                let body = body.clone();
                async move {
                    api.hits.fetch_add(1, Ordering::SeqCst);
                    *api.last_query.lock().unwrap() = params;
                    (status, body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let settings = GoogleBooksSettings {
            base_url: format!("http://{}/", addr),
            api_key: "test-key".to_string(),
            max_results: 20,
        };
        (BookSearch::new(&settings), api)
    }

    #[tokio::test]
    async fn test_empty_query_makes_no_call() {
        let (search, api) = mock_api(StatusCode::OK, r#"{"items":[]}"#).await;

        let outcome = search.search("").await;

        assert_eq!(outcome, SearchOutcome::empty(""));
        assert!(outcome.books.is_empty());
        assert_eq!(outcome.query, "");
        assert_eq!(api.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_authors_become_unknown() {
        let (search, api) = mock_api(
            StatusCode::OK,
            r#"{"items":[{"volumeInfo":{"title":"Dune"}}]}"#,
        )
        .await;

        let outcome = search.search("dune").await;

        assert_eq!(outcome.query, "dune");
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.books.len(), 1);
        assert_eq!(outcome.books[0].title, "Dune");
        assert_eq!(outcome.books[0].authors, UNKNOWN_AUTHORS);

        let params = api.last_query.lock().unwrap().clone();
        assert_eq!(params["q"], "dune");
        assert_eq!(params["key"], "test-key");
        assert_eq!(params["maxResults"], "20");
    }

    #[tokio::test]
    async fn test_server_error_yields_message_with_excerpt() {
        let (search, _api) = mock_api(StatusCode::INTERNAL_SERVER_ERROR, "x".repeat(300)).await;

        let outcome = search.search("dune").await;

        assert!(outcome.books.is_empty());
        let error = outcome.error.expect("error message");
        assert!(error.starts_with("Google Books API error: 500 - "));
        assert_eq!(
            error,
            format!("Google Books API error: 500 - {}...", "x".repeat(100))
        );
    }

    #[tokio::test]
    async fn test_malformed_body_yields_retry_message() {
        let (search, _api) = mock_api(StatusCode::OK, "<html>not json</html>").await;

        let outcome = search.search("dune").await;

        assert!(outcome.books.is_empty());
        assert_eq!(outcome.error.as_deref(), Some(FETCH_FAILED));
    }

    #[tokio::test]
    async fn test_item_without_volume_info_yields_retry_message() {
        let (search, api) = mock_api(StatusCode::OK, r#"{"items":[{}]}"#).await;

        let outcome = search.search("dune").await;

        assert_eq!(api.hits.load(Ordering::SeqCst), 1);
        assert!(outcome.books.is_empty());
        assert_eq!(
            outcome.error.as_deref(),
            Some("Failed to fetch books. Please try again later.")
        );
    }

    #[tokio::test]
    async fn test_unreachable_api_yields_retry_message() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let search = BookSearch::new(&GoogleBooksSettings {
            base_url: format!("http://{}", addr),
            ..GoogleBooksSettings::default()
        });
        let outcome = search.search("dune").await;

        assert_eq!(outcome.query, "dune");
        assert!(outcome.books.is_empty());
        assert_eq!(outcome.error.as_deref(), Some(FETCH_FAILED));
    }
}
