// SPDX-License-Identifier: GPL-3.0-only

use std::sync::{Arc, PoisonError, RwLock};

use crate::{
    Config,
    backend::{DataStore, FavoritesClient, TransactionManager},
    dispatch::Dispatcher,
    guard::BusyGuard,
};

/// Everything a transaction flow needs from the rest of the application.
pub struct StateInfo {
    config: RwLock<Config>,
    pub busy: BusyGuard,
    pub dispatcher: Dispatcher,
    favorites: Option<Arc<dyn FavoritesClient>>,
    auth_token: RwLock<Option<String>>,
}

impl StateInfo {
    pub fn new(
        config: Config,
        manager: Arc<dyn TransactionManager>,
        data_store: Arc<dyn DataStore>,
    ) -> Self {
        let dispatcher = Dispatcher::new(manager, data_store);
        Self {
            config: RwLock::new(config),
            busy: BusyGuard::new(),
            dispatcher,
            favorites: None,
            auth_token: RwLock::new(None),
        }
    }

    pub fn with_favorites(mut self, favorites: Arc<dyn FavoritesClient>) -> Self {
        self.favorites = Some(favorites);
        self
    }

    /// Snapshot of the current config, read again by every transaction
    pub fn config(&self) -> Config {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_config(&self, config: Config) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    pub fn manager(&self) -> &Arc<dyn TransactionManager> {
        self.dispatcher.manager()
    }

    pub fn favorites(&self) -> Option<&Arc<dyn FavoritesClient>> {
        self.favorites.as_ref()
    }

    pub fn auth_token(&self) -> Option<String> {
        self.auth_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_auth_token(&self, token: Option<String>) {
        *self
            .auth_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token;
    }
}
