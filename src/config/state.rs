// Application state module
// Bundles resolved configuration with the storage handle

use super::types::Config;
use crate::store::PostStore;

/// Application state shared across request handler tasks
pub struct AppState {
    pub config: Config,
    pub store: PostStore,
}

impl AppState {
    /// Create `AppState`, resolving the backing file path from config
    pub fn new(config: Config) -> Self {
        let store = PostStore::new(config.storage.resolve_data_file());
        Self { config, store }
    }
}
