pub mod books;
pub mod requests;

use std::sync::Arc;

use shelf_db::RequestStore;
use shelf_kernel::ModuleRegistry;

use crate::views::Views;
use books::client::BookSearch;

/// Shared services the application modules are built from
pub struct Components {
    pub store: Arc<dyn RequestStore>,
    pub search: BookSearch,
    pub views: Arc<Views>,
}

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, components: Components) {
    registry.register(requests::create_module(
        components.store,
        components.views.clone(),
    ));
    registry.register(books::create_module(components.search, components.views));
}
