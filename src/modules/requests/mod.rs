pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use shelf_db::RequestStore;
use shelf_kernel::{InitCtx, Module};

use crate::views::Views;

/// The request board: list, add, mark available, delete
pub struct RequestsModule {
    state: RequestsState,
}

#[derive(Clone)]
pub struct RequestsState {
    pub store: Arc<dyn RequestStore>,
    pub views: Arc<Views>,
}

impl RequestsModule {
    pub fn new(store: Arc<dyn RequestStore>, views: Arc<Views>) -> Self {
        Self {
            state: RequestsState { store, views },
        }
    }
}

#[async_trait]
impl Module for RequestsModule {
    fn name(&self) -> &'static str {
        "requests"
    }

    fn mount_path(&self) -> String {
        "/".to_string()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let requests = self.state.store.list().await.len();
        tracing::info!(
            module = self.name(),
            store = %ctx.settings.store.path.display(),
            requests,
            "requests module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let redirect = serde_json::json!({
            "303": {
                "description": "Redirect to the request list",
                "headers": { "Location": { "schema": { "type": "string" } } }
            },
            "500": {
                "description": "The store could not be written",
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            }
        });
        let id_form = serde_json::json!({
            "required": true,
            "content": {
                "application/x-www-form-urlencoded": {
                    "schema": { "$ref": "#/components/schemas/RequestIdForm" }
                },
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/RequestIdForm" }
                }
            }
        });

        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List book requests",
                        "tags": ["Requests"],
                        "responses": {
                            "200": {
                                "description": "Request list page",
                                "content": { "text/html": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                },
                "/add-request": {
                    "post": {
                        "summary": "Submit a book request",
                        "tags": ["Requests"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/x-www-form-urlencoded": {
                                    "schema": { "$ref": "#/components/schemas/NewRequest" }
                                },
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/NewRequest" }
                                }
                            }
                        },
                        "responses": redirect.clone()
                    }
                },
                "/mark-available": {
                    "post": {
                        "summary": "Toggle whether a request is available",
                        "tags": ["Requests"],
                        "requestBody": id_form.clone(),
                        "responses": redirect.clone()
                    }
                },
                "/delete-request": {
                    "post": {
                        "summary": "Delete a request",
                        "tags": ["Requests"],
                        "requestBody": id_form,
                        "responses": redirect
                    }
                }
            },
            "components": {
                "schemas": {
                    "NewRequest": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "description": "Who is asking" },
                            "title": { "type": "string", "description": "Requested title" },
                            "author": { "type": "string", "description": "Requested author" },
                            "notes": { "type": "string", "description": "Free-form notes" }
                        }
                    },
                    "RequestIdForm": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "description": "Request identifier" }
                        }
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "requests module stopped");
        Ok(())
    }
}

/// Create a new instance of the requests module
pub fn create_module(store: Arc<dyn RequestStore>, views: Arc<Views>) -> Arc<dyn Module> {
    Arc::new(RequestsModule::new(store, views))
}
