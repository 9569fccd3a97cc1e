//! SHELF application library
//!
//! Wires the request store, the Google Books client and the page templates
//! into modules and runs them behind the HTTP server.

pub mod modules;
pub mod views;

use std::sync::Arc;

use anyhow::Context;
use shelf_db::JsonFileStore;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use modules::{books::client::BookSearch, Components};
use views::Views;

/// Build the production components: file-backed store, live Google Books client
pub async fn components(settings: &Settings) -> anyhow::Result<Components> {
    let store = JsonFileStore::load(&settings.store.path).await;
    let views = Views::new().context("failed to compile page templates")?;

    Ok(Components {
        store: Arc::new(store),
        search: BookSearch::new(&settings.google_books),
        views: Arc::new(views),
    })
}

/// Registry with every application module registered
pub fn registry(components: Components) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, components);
    registry
}

/// Run the application until Ctrl-C
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = registry(components(&settings).await?);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = shelf_http::start_server(&registry, &settings, shelf_http::shutdown_signal()).await;

    registry.stop_modules().await?;
    served
}
