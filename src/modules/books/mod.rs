pub mod client;
pub mod models;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use shelf_http::error::AppError;
use shelf_kernel::{InitCtx, Module};

use crate::views::Views;
use client::BookSearch;

/// Google Books lookup page, used to verify a title before requesting it
pub struct BooksModule {
    state: BooksState,
}

#[derive(Clone)]
struct BooksState {
    search: BookSearch,
    views: Arc<Views>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: Option<String>,
}

impl BooksModule {
    pub fn new(search: BookSearch, views: Arc<Views>) -> Self {
        Self {
            state: BooksState { search, views },
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    fn mount_path(&self) -> String {
        "/".to_string()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            base_url = %ctx.settings.google_books.base_url,
            max_results = ctx.settings.google_books.max_results,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/search-books", get(search_books))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/search-books": {
                    "get": {
                        "summary": "Search Google Books",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "q",
                            "in": "query",
                            "required": false,
                            "description": "Free-text query; empty renders the bare search form",
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": {
                                "description": "Search page with matching books or an error message",
                                "content": { "text/html": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "BookResult": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "authors": {
                                "type": "string",
                                "description": "Comma-joined author names, or \"Unknown\""
                            },
                            "description": { "type": "string" },
                            "thumbnail": { "type": "string", "format": "uri" }
                        },
                        "required": ["title", "authors", "description", "thumbnail"]
                    }
                }
            }
        }))
    }
}

/// Search page; lookup failures are shown on the page, not as HTTP errors
async fn search_books(
    State(state): State<BooksState>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let outcome = state
        .search
        .search(params.q.as_deref().unwrap_or_default())
        .await;
    let page = state
        .views
        .search(&outcome)
        .context("failed to render search page")?;
    Ok(Html(page))
}

/// Create a new instance of the books module
pub fn create_module(search: BookSearch, views: Arc<Views>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(search, views))
}
