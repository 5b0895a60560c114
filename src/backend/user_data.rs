// SPDX-License-Identifier: GPL-3.0-only

use std::{
    io,
    path::PathBuf,
    sync::{Mutex, PoisonError},
    time::Instant,
};

use async_trait::async_trait;

use super::DataStore;
use crate::{AppId, Error, Result};

/// Deletes `<root>/<app id>`, the way per-app data directories are laid out
/// under `~/.var/app`.
#[derive(Debug)]
pub struct UserDataStore {
    root: PathBuf,
}

impl UserDataStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path(&self, id: &AppId) -> Result<PathBuf> {
        match id.data_dir_name() {
            Some(name) => Ok(self.root.join(name)),
            None => Err(Error::ReapFailed(format!("invalid app id {:?}", id.raw()))),
        }
    }
}

#[async_trait]
impl DataStore for UserDataStore {
    async fn reap(&self, id: &AppId) -> Result<()> {
        let path = self.path(id)?;
        let start = Instant::now();
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => {
                log::info!("removed {:?} in {:?}", path, start.elapsed());
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("no user data at {:?}", path);
                Ok(())
            }
            Err(err) => Err(Error::ReapFailed(format!("{:?}: {}", path, err))),
        }
    }
}

/// Only records what would have been reaped.
#[derive(Debug, Default)]
pub struct LogStore {
    reaped: Mutex<Vec<AppId>>,
}

impl LogStore {
    pub fn reaped(&self) -> Vec<AppId> {
        self.reaped
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl DataStore for LogStore {
    async fn reap(&self, id: &AppId) -> Result<()> {
        log::info!("would reap user data of {}", id);
        self.reaped
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(id.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reaps_app_directory() {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join("org.gnome.Maps");
        std::fs::create_dir_all(app_dir.join("config")).unwrap();
        std::fs::write(app_dir.join("config").join("settings"), "x").unwrap();
        std::fs::create_dir_all(dir.path().join("org.gnome.Weather")).unwrap();

        let store = UserDataStore::new(dir.path().to_path_buf());
        store.reap(&AppId::new("org.gnome.Maps.desktop")).await.unwrap();
        assert!(!app_dir.exists());
        assert!(dir.path().join("org.gnome.Weather").exists());
    }

    #[tokio::test]
    async fn missing_directory_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserDataStore::new(dir.path().to_path_buf());
        store.reap(&AppId::new("org.gnome.Maps")).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_escaping_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserDataStore::new(dir.path().join("app"));
        for id in ["..", "../app", ""] {
            assert!(matches!(
                store.reap(&AppId::new(id)).await,
                Err(Error::ReapFailed(_))
            ));
        }
        assert!(dir.path().exists());
    }
}
