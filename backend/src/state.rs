//! Application state management
//!
//! Shared state passed to all request handlers via Axum's state extraction.
//! Every field is cheap to clone.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::store::{FoodCatalog, MealStore, MemoryStore, PgStore, ProfileStore};
use std::sync::Arc;

/// Store ports the services run against
#[derive(Clone)]
pub struct Stores {
    pub profiles: Arc<dyn ProfileStore>,
    pub foods: Arc<dyn FoodCatalog>,
    pub meals: Arc<dyn MealStore>,
}

impl Stores {
    pub fn postgres(store: PgStore) -> Self {
        let store = Arc::new(store);
        Self {
            profiles: store.clone(),
            foods: store.clone(),
            meals: store,
        }
    }

    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            profiles: store.clone(),
            foods: store.clone(),
            meals: store,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Token verifier with its decoding key computed once
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(stores: Stores, config: AppConfig) -> Self {
        let jwt = JwtService::new(&config.auth.jwt_secret, &config.auth.audience);

        Self {
            stores,
            config: Arc::new(config),
            jwt,
        }
    }

    #[inline]
    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_clone_shares_stores() {
        let state = AppState::new(Stores::memory(MemoryStore::new()), AppConfig::default());
        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.stores.meals, &cloned.stores.meals));
        assert!(Arc::ptr_eq(&state.config, &cloned.config));
    }
}
