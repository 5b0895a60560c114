// SPDX-License-Identifier: GPL-3.0-only

use std::{
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::sync::watch;

use super::TransactionManager;
use crate::{Error, Result, Transaction};

/// Transaction manager that runs nothing.
///
/// Submissions are queued one at a time, wait while paused, take `delay` to
/// "run" and are then recorded as finished.
#[derive(Debug)]
pub struct DryRun {
    queue: tokio::sync::Mutex<()>,
    paused: watch::Sender<bool>,
    active: AtomicBool,
    cancelled: AtomicBool,
    pending: AtomicUsize,
    delay: Duration,
    failure: Mutex<Option<String>>,
    finished: Mutex<Vec<Transaction>>,
}

impl Default for DryRun {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl DryRun {
    pub fn new(delay: Duration) -> Self {
        Self {
            queue: tokio::sync::Mutex::new(()),
            paused: watch::Sender::new(false),
            active: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
            delay,
            failure: Mutex::new(None),
            finished: Mutex::new(Vec::new()),
        }
    }

    /// Make the next transaction fail with `message`
    pub fn fail_next(&self, message: &str) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.to_string());
    }

    /// Transactions that finished successfully, oldest first
    pub fn finished(&self) -> Vec<Transaction> {
        self.finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn run(&self, transaction: &Transaction) -> Result<()> {
        let mut paused = self.paused.subscribe();
        let resumed = paused.wait_for(|paused| !*paused).await.is_ok();
        if !resumed {
            return Err(Error::TransactionFailed("manager shut down".to_string()));
        }

        self.cancelled.store(false, Ordering::Relaxed);
        self.active.store(true, Ordering::Relaxed);
        let start = Instant::now();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.active.store(false, Ordering::Relaxed);

        if self.cancelled.swap(false, Ordering::Relaxed) {
            return Err(Error::TransactionFailed("cancelled".to_string()));
        }
        if let Some(message) = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            let (title, _body) = transaction.failed_dialog(&message);
            log::error!("{}", title);
            return Err(Error::TransactionFailed(message));
        }
        log::info!("{} in {:?}", transaction.completed_text(), start.elapsed());
        Ok(())
    }
}

#[async_trait]
impl TransactionManager for DryRun {
    async fn submit(&self, transaction: Transaction) -> Result<()> {
        self.pending.fetch_add(1, Ordering::Relaxed);
        let res = {
            let _queue = self.queue.lock().await;
            self.run(&transaction).await
        };
        self.pending.fetch_sub(1, Ordering::Relaxed);
        if res.is_ok() {
            self.finished
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(transaction);
        }
        res
    }

    fn is_busy(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    fn is_paused(&self) -> bool {
        *self.paused.borrow()
    }

    fn has_transactions(&self) -> bool {
        self.pending.load(Ordering::Relaxed) > 0
            || !self
                .finished
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_empty()
    }

    fn set_paused(&self, paused: bool) {
        log::info!("transactions paused: {}", paused);
        self.paused.send_replace(paused);
    }

    fn cancel_current(&self) {
        if self.is_busy() {
            self.cancelled.store(true, Ordering::Relaxed);
        }
    }

    fn clear_finished(&self) {
        self.finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
