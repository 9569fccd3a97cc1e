use anyhow::Context;
use axum::{
    extract::State,
    response::{Html, Redirect},
    routing::{get, post},
    Router,
};
use shelf_db::NewRequest;
use shelf_http::{error::AppError, extract::FormOrJson};

use super::{models::RequestIdForm, RequestsState};

pub fn router(state: RequestsState) -> Router {
    Router::new()
        .route("/", get(show_home))
        .route("/add-request", post(add_request))
        .route("/mark-available", post(mark_available))
        .route("/delete-request", post(delete_request))
        .with_state(state)
}

/// Home page listing every request
async fn show_home(State(state): State<RequestsState>) -> Result<Html<String>, AppError> {
    let requests = state.store.list().await;
    let page = state
        .views
        .index(&requests)
        .context("failed to render request list")?;
    Ok(Html(page))
}

async fn add_request(
    State(state): State<RequestsState>,
    FormOrJson(request): FormOrJson<NewRequest>,
) -> Result<Redirect, AppError> {
    state
        .store
        .add(request)
        .await
        .context("failed to save request")?;
    Ok(Redirect::to("/"))
}

/// Toggle availability; unknown ids are ignored
async fn mark_available(
    State(state): State<RequestsState>,
    FormOrJson(form): FormOrJson<RequestIdForm>,
) -> Result<Redirect, AppError> {
    state
        .store
        .toggle(&form.id)
        .await
        .context("failed to update request")?;
    Ok(Redirect::to("/"))
}

async fn delete_request(
    State(state): State<RequestsState>,
    FormOrJson(form): FormOrJson<RequestIdForm>,
) -> Result<Redirect, AppError> {
    state
        .store
        .remove(&form.id)
        .await
        .context("failed to delete request")?;
    Ok(Redirect::to("/"))
}
