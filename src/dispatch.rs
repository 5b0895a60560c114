// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    AppTheme, Direction, Result, Transaction, TransactionRequest,
    backend::{DataStore, TransactionManager},
    surface::{Anchor, Comet, Rgba, Surface, SurfaceHandle},
};

pub const DESTRUCTIVE_DARK: Rgba = Rgba {
    red: 0.3,
    green: 0.2,
    blue: 0.21,
    alpha: 0.6,
};

pub const DESTRUCTIVE_LIGHT: Rgba = Rgba {
    red: 0.95,
    green: 0.84,
    blue: 0.84,
    alpha: 0.6,
};

/// Turns confirmed requests into transactions for the manager.
#[derive(Clone)]
pub struct Dispatcher {
    manager: Arc<dyn TransactionManager>,
    data_store: Arc<dyn DataStore>,
}

impl Dispatcher {
    pub fn new(manager: Arc<dyn TransactionManager>, data_store: Arc<dyn DataStore>) -> Self {
        Self {
            manager,
            data_store,
        }
    }

    pub fn manager(&self) -> &Arc<dyn TransactionManager> {
        &self.manager
    }

    fn comet(
        surface: &dyn Surface,
        request: &TransactionRequest,
        source: Option<Anchor>,
        app_theme: AppTheme,
    ) -> Option<Comet> {
        let icon = request.entry.icon.clone()?;
        let source = source.unwrap_or(Anchor::NavigationRoot);
        let target = if surface.sidebar_shown() {
            Anchor::TransactionsSidebarToggle
        } else {
            Anchor::TransactionsToggle
        };
        Some(match request.direction {
            Direction::Install => Comet {
                from: source,
                to: target,
                icon,
                pulse: None,
            },
            Direction::Remove => Comet {
                from: target,
                to: source,
                icon,
                pulse: Some(if app_theme.is_dark(surface.prefers_dark()) {
                    DESTRUCTIVE_DARK
                } else {
                    DESTRUCTIVE_LIGHT
                }),
            },
        })
    }

    /// Submit `request` and wait for the manager to finish it.
    ///
    /// The comet is decoration and is skipped if the surface is already gone.
    /// Its removal tint follows `app_theme`.
    /// After success, a requested user data deletion is started but not
    /// awaited.
    pub async fn dispatch(
        &self,
        request: TransactionRequest,
        source: Option<Anchor>,
        surface: &SurfaceHandle,
        app_theme: AppTheme,
    ) -> Result<()> {
        let transaction = Transaction::new(request.entry.clone(), request.direction);

        if let Ok(surface) = surface.upgrade() {
            if let Some(comet) = Self::comet(surface.as_ref(), &request, source, app_theme) {
                surface.spawn_comet(comet);
            }
        }

        log::info!("submitting {}", transaction.pending_text(0));
        self.manager.submit(transaction).await?;

        if request.delete_user_data {
            self.reap(request);
        }
        Ok(())
    }

    fn reap(&self, request: TransactionRequest) {
        let data_store = self.data_store.clone();
        tokio::spawn(async move {
            match data_store.reap(&request.reap_id).await {
                Ok(()) => log::info!("reaped user data of {}", request.reap_id),
                Err(err) => log::warn!("{}", err),
            }
        });
    }

    /// Submit every available update in one transaction in the background
    pub fn update(&self, transaction: Transaction) -> JoinHandle<Result<()>> {
        let manager = self.manager.clone();
        tokio::spawn(async move {
            let text = transaction.completed_text();
            let res = manager.submit(transaction).await;
            match &res {
                Ok(()) => log::info!("{}", text),
                Err(err) => log::error!("failed to update: {}", err),
            }
            res
        })
    }
}
