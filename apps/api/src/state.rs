use std::sync::Arc;

use crate::auth::jwt::TokenService;
use crate::config::Config;
use crate::repository::{
    ApplicationRepository, CatalogRepository, JobRepository, ProfileRepository,
    SavedJobRepository, UserRepository,
};
use crate::storage::FileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub saved_jobs: Arc<dyn SavedJobRepository>,
    /// Upload storage for profile photos and resumes.
    pub files: Arc<dyn FileStore>,
    pub tokens: TokenService,
    pub config: Config,
}

impl AppState {
    /// Wires every repository handle to one store.
    pub fn new<S>(store: Arc<S>, files: Arc<dyn FileStore>, config: Config) -> Self
    where
        S: UserRepository
            + ProfileRepository
            + CatalogRepository
            + JobRepository
            + ApplicationRepository
            + SavedJobRepository
            + 'static,
    {
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_expiration_secs);
        AppState {
            users: store.clone(),
            profiles: store.clone(),
            catalog: store.clone(),
            jobs: store.clone(),
            applications: store.clone(),
            saved_jobs: store,
            files,
            tokens,
            config,
        }
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::repository::memory::MemoryStore;
    use crate::storage::memory::MemoryFileStore;

    pub struct TestContext {
        pub state: AppState,
        pub store: Arc<MemoryStore>,
        pub files: Arc<MemoryFileStore>,
    }

    pub fn test_context() -> TestContext {
        let store = Arc::new(MemoryStore::new());
        let files = Arc::new(MemoryFileStore::default());
        let state = AppState::new(store.clone(), files.clone(), Config::for_tests());
        TestContext {
            state,
            store,
            files,
        }
    }
}
