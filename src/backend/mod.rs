// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use async_trait::async_trait;

use crate::{AppId, Config, Result, Transaction};

pub use self::dry_run::DryRun;
mod dry_run;

pub use self::user_data::{LogStore, UserDataStore};
mod user_data;

/// Owner of all in-flight transaction state.
///
/// Implementations serialize concurrent submissions themselves and own any
/// retry policy.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    /// Queue `transaction` and wait for it to finish
    async fn submit(&self, transaction: Transaction) -> Result<()>;
    /// A transaction is currently running
    fn is_busy(&self) -> bool;
    fn is_paused(&self) -> bool;
    /// Anything queued, running or finished but not cleared
    fn has_transactions(&self) -> bool;
    fn set_paused(&self, paused: bool);
    fn cancel_current(&self);
    fn clear_finished(&self);
}

#[async_trait]
pub trait DataStore: Send + Sync {
    /// Permanently delete the user data of `id`
    async fn reap(&self, id: &AppId) -> Result<()>;
}

#[async_trait]
pub trait FavoritesClient: Send + Sync {
    async fn remove_favorite(&self, id: &AppId, token: &str) -> Result<()>;
}

/// Pick the data store described by `config`
pub fn data_store(config: &Config) -> Arc<dyn DataStore> {
    match &config.user_data_root {
        Some(root) => {
            log::info!("reaping user data under {:?}", root);
            Arc::new(UserDataStore::new(root.clone()))
        }
        None => {
            log::info!("no user data root configured, reaping is logged only");
            Arc::new(LogStore::default())
        }
    }
}
