use crate::config::Config;
use crate::error::ApiError;
use crate::store::BookStore;
use std::sync::Arc;

/// Shared application state
///
/// `store` is `None` when the startup connection failed; the service then runs
/// degraded and book endpoints answer 503.
#[derive(Clone)]
pub struct AppState {
    pub store: Option<Arc<dyn BookStore>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn BookStore>>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> Result<&dyn BookStore, ApiError> {
        self.store.as_deref().ok_or(ApiError::StoreUnavailable)
    }
}

#[cfg(test)]
impl AppState {
    pub fn in_memory() -> Self {
        let store: Arc<dyn BookStore> = Arc::new(crate::store::MemoryStore::new());
        Self::new(Some(store), Config::for_tests())
    }

    pub fn degraded() -> Self {
        Self::new(None, Config::for_tests())
    }
}
