// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    Direction, Entry, EntryGroup, Error, Result, Transaction, TransactionRequest,
    confirm::{self, eligible_variants, should_skip_entry},
    resolve,
    state::StateInfo,
    surface::{Anchor, Surface, SurfaceHandle},
};

/// What a transaction is started from.
#[derive(Clone, Debug)]
pub enum Target {
    Entry(Arc<Entry>),
    /// Resolved to one of its eligible entries during the flow
    Group(Arc<dyn EntryGroup>),
}

/// Requests from pages and tiles, handled in the order they are sent.
#[derive(Clone, Debug)]
pub enum Message {
    FullViewInstall {
        group: Arc<dyn EntryGroup>,
        source: Option<Anchor>,
    },
    FullViewRemove {
        group: Arc<dyn EntryGroup>,
        source: Option<Anchor>,
    },
    InstallAddon(Arc<Entry>),
    RemoveAddon(Arc<Entry>),
    InstallEntry(Arc<Entry>),
    RemoveInstalled(Arc<Entry>),
    UpdateAll(Vec<Arc<Entry>>),
    PauseTransactions(bool),
    StopTransactions,
    ClearTransactions,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TransactionsStatus {
    pub has_transactions: bool,
    pub paused: bool,
    pub active: bool,
}

pub type TransactTask = JoinHandle<Result<()>>;

pub struct Store {
    state: Arc<StateInfo>,
}

impl Store {
    pub fn new(state: Arc<StateInfo>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<StateInfo> {
        &self.state
    }

    pub fn transactions_status(&self) -> TransactionsStatus {
        let manager = self.state.manager();
        TransactionsStatus {
            has_transactions: manager.has_transactions(),
            paused: manager.is_paused(),
            active: manager.is_busy(),
        }
    }

    /// Handle one message, returning the spawned transaction task if it
    /// started one
    pub fn handle(&self, surface: &Arc<dyn Surface>, message: Message) -> Option<TransactTask> {
        log::debug!("handling {:?}", message);
        match message {
            Message::FullViewInstall { group, source } => {
                self.try_transact(surface, Target::Group(group), Direction::Install, true, source)
            }
            Message::FullViewRemove { group, source } => {
                self.try_transact(surface, Target::Group(group), Direction::Remove, false, source)
            }
            Message::InstallAddon(entry) => {
                self.try_transact(surface, Target::Entry(entry), Direction::Install, true, None)
            }
            Message::RemoveAddon(entry) => {
                self.try_transact(surface, Target::Entry(entry), Direction::Remove, true, None)
            }
            Message::InstallEntry(entry) => {
                self.try_transact(surface, Target::Entry(entry), Direction::Install, false, None)
            }
            Message::RemoveInstalled(entry) => {
                self.try_transact(surface, Target::Entry(entry), Direction::Remove, false, None)
            }
            Message::UpdateAll(entries) => {
                if entries.is_empty() {
                    log::warn!("no updates to apply");
                    None
                } else {
                    Some(self.state.dispatcher.update(Transaction::update(entries)))
                }
            }
            Message::PauseTransactions(paused) => {
                self.state.manager().set_paused(paused);
                None
            }
            Message::StopTransactions => {
                let manager = self.state.manager();
                manager.set_paused(true);
                manager.cancel_current();
                None
            }
            Message::ClearTransactions => {
                self.state.manager().clear_finished();
                None
            }
        }
    }

    /// Start a transaction flow for `target` unless the application is busy.
    ///
    /// The returned task resolves once the transaction has finished, or with
    /// [`Error::UserCancelled`] if nothing was confirmed.
    pub fn try_transact(
        &self,
        surface: &Arc<dyn Surface>,
        target: Target,
        direction: Direction,
        auto_confirm: bool,
        source: Option<Anchor>,
    ) -> Option<TransactTask> {
        if !self.state.busy.guard(surface.as_ref()) {
            log::info!("rejected {} of {:?} while busy", direction, target);
            return None;
        }

        let state = self.state.clone();
        let surface = SurfaceHandle::new(surface);
        Some(tokio::spawn(async move {
            let res = transact(&state, &surface, &target, direction, auto_confirm, source).await;
            if let Err(err) = &res {
                log::debug!("{} of {:?} ended: {}", direction, target, err);
                surface.report(err);
            }
            res
        }))
    }

    /// Handle messages in order until every sender is dropped, then wait for
    /// the transactions that are still running.
    pub async fn run(&self, surface: SurfaceHandle, mut rx: mpsc::UnboundedReceiver<Message>) {
        let mut tasks = Vec::<TransactTask>::new();
        while let Some(message) = rx.recv().await {
            let surface = match surface.upgrade() {
                Ok(ok) => ok,
                Err(_) => {
                    log::info!("surface closed, dropping {:?}", message);
                    break;
                }
            };
            tasks.retain(|task| !task.is_finished());
            if let Some(task) = self.handle(&surface, message) {
                tasks.push(task);
            }
        }

        for task in tasks {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => log::debug!("transaction task failed: {}", err),
                Err(err) => log::error!("transaction task panicked: {}", err),
            }
        }
    }
}

async fn transact(
    state: &StateInfo,
    surface: &SurfaceHandle,
    target: &Target,
    direction: Direction,
    auto_confirm: bool,
    source: Option<Anchor>,
) -> Result<()> {
    surface.upgrade()?;

    let (title, reap_id, variants) = match target {
        Target::Group(group) => {
            let entries = resolve::materialize(group.as_ref()).await?;
            surface.upgrade()?;
            let variants = eligible_variants(entries, direction);
            if variants.is_empty() {
                return Err(Error::NotFound(format!(
                    "No entry of {} can be {}",
                    group.title(),
                    direction.past_tense()
                )));
            }
            (group.title().to_string(), group.id().clone(), variants)
        }
        Target::Entry(entry) => {
            if should_skip_entry(entry, direction) {
                return Err(Error::NotFound(format!(
                    "{} can't be {} right now",
                    entry.title,
                    direction.past_tense()
                )));
            }
            (entry.title.clone(), entry.id.clone(), Vec::new())
        }
    };

    let decision = confirm::confirm(surface, &title, direction, &variants, auto_confirm).await?;

    let entry = match target {
        Target::Entry(entry) => entry.clone(),
        Target::Group(_) => match variants.get(decision.variant).or(variants.first()) {
            Some(entry) => entry.clone(),
            None => return Err(Error::NotFound("No entry candidates left".to_string())),
        },
    };

    let request = TransactionRequest {
        entry,
        direction: decision.direction,
        delete_user_data: decision.delete_user_data,
        reap_id,
    };
    let app_theme = state.config().app_theme;
    state
        .dispatcher
        .dispatch(request, source, surface, app_theme)
        .await
}
