// SPDX-License-Identifier: GPL-3.0-only

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use store_transact::{
    AppId, Config, Entry, EntryGroup, EntryIcon, Error, Result,
    backend::{DryRun, FavoritesClient, LogStore},
    catalog::CatalogGroup,
    dialog::{AlertDialog, DialogOutcome, DialogResponder},
    state::StateInfo,
    store::Store,
    surface::{Comet, Surface},
};

type Reply = Box<dyn FnOnce(&AlertDialog) -> Option<DialogOutcome> + Send>;

/// Surface that records everything and answers dialogs from a script.
///
/// Dialogs without a scripted reply stay open until [`FakeSurface`] is
/// dropped or [`FakeSurface::answer_held`] is called.
#[derive(Default)]
pub struct FakeSurface {
    pub dark: bool,
    pub sidebar: bool,
    replies: Mutex<VecDeque<Reply>>,
    held: Mutex<Vec<(AlertDialog, DialogResponder)>>,
    pub toasts: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
    pub dialogs: Mutex<Vec<AlertDialog>>,
    pub comets: Mutex<Vec<Comet>>,
    pub uris: Mutex<Vec<String>>,
    pub addons: Mutex<Vec<(String, Vec<AppId>)>>,
}

impl FakeSurface {
    pub fn new(dark: bool, sidebar: bool) -> Self {
        Self {
            dark,
            sidebar,
            ..Default::default()
        }
    }

    pub fn reply(&self, f: impl FnOnce(&AlertDialog) -> Option<DialogOutcome> + Send + 'static) {
        self.replies.lock().unwrap().push_back(Box::new(f));
    }

    /// Activate `response` with the initial selections
    pub fn respond(&self, response: &'static str) {
        self.reply(move |dialog| Some(dialog.outcome(response)));
    }

    /// Dismiss the next dialog without a response
    pub fn close(&self) {
        self.reply(|_| None);
    }

    pub fn held(&self) -> usize {
        self.held.lock().unwrap().len()
    }

    pub fn answer_held(&self, response: &str) {
        for (dialog, responder) in self.held.lock().unwrap().drain(..) {
            responder.respond(dialog.outcome(response));
        }
    }

    pub fn dialogs(&self) -> Vec<AlertDialog> {
        self.dialogs.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn toasts(&self) -> Vec<String> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn comets(&self) -> Vec<Comet> {
        self.comets.lock().unwrap().clone()
    }

    pub fn uris(&self) -> Vec<String> {
        self.uris.lock().unwrap().clone()
    }
}

impl Surface for FakeSurface {
    fn add_toast(&self, message: &str) {
        self.toasts.lock().unwrap().push(message.to_string());
    }

    fn show_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn present(&self, dialog: AlertDialog, responder: DialogResponder) {
        self.dialogs.lock().unwrap().push(dialog.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(reply) => {
                if let Some(outcome) = reply(&dialog) {
                    responder.respond(outcome);
                }
            }
            None => self.held.lock().unwrap().push((dialog, responder)),
        }
    }

    fn sidebar_shown(&self) -> bool {
        self.sidebar
    }

    fn prefers_dark(&self) -> bool {
        self.dark
    }

    fn spawn_comet(&self, comet: Comet) {
        self.comets.lock().unwrap().push(comet);
    }

    fn launch_uri(&self, uri: &str) {
        self.uris.lock().unwrap().push(uri.to_string());
    }

    fn present_addons(&self, entry: Arc<Entry>, addons: Vec<AppId>) {
        self.addons
            .lock()
            .unwrap()
            .push((entry.unique_id.clone(), addons));
    }
}

pub fn entry(id: &str, unique_id: &str, installed: bool) -> Entry {
    Entry {
        id: AppId::new(id),
        unique_id: unique_id.to_string(),
        title: "Maps".to_string(),
        source_name: "Flathub".to_string(),
        installed,
        holding: false,
        donation_url: None,
        icon: Some(EntryIcon::Stock(id.to_string())),
        addons: Vec::new(),
    }
}

/// Group that counts how often its entries are loaded and can fail loading.
#[derive(Debug)]
pub struct TestGroup {
    inner: CatalogGroup,
    loads: AtomicUsize,
    fail: Option<String>,
}

impl TestGroup {
    pub fn new(entries: Vec<Entry>) -> Arc<Self> {
        Arc::new(Self {
            inner: CatalogGroup::new(AppId::new("org.gnome.Maps"), "Maps", entries),
            loads: AtomicUsize::new(0),
            fail: None,
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: CatalogGroup::new(AppId::new("org.gnome.Maps"), "Maps", Vec::new()),
            loads: AtomicUsize::new(0),
            fail: Some(message.to_string()),
        })
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn entries(&self) -> &[Arc<Entry>] {
        self.inner.entries()
    }
}

#[async_trait]
impl EntryGroup for TestGroup {
    fn id(&self) -> &AppId {
        self.inner.id()
    }

    fn title(&self) -> &str {
        self.inner.title()
    }

    fn installable(&self) -> usize {
        self.inner.installable()
    }

    fn removable(&self) -> usize {
        self.inner.removable()
    }

    async fn materialize_entries(&self) -> Result<Vec<Arc<Entry>>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match &self.fail {
            Some(message) => Err(Error::Load(message.clone())),
            None => self.inner.materialize_entries().await,
        }
    }
}

#[derive(Default)]
pub struct FakeFavorites {
    pub fail: bool,
    pub removed: Mutex<Vec<(AppId, String)>>,
}

#[async_trait]
impl FavoritesClient for FakeFavorites {
    async fn remove_favorite(&self, id: &AppId, token: &str) -> Result<()> {
        if self.fail {
            return Err(Error::Favorites("unauthorized".to_string()));
        }
        self.removed
            .lock()
            .unwrap()
            .push((id.clone(), token.to_string()));
        Ok(())
    }
}

pub struct Harness {
    pub fake: Arc<FakeSurface>,
    pub surface: Arc<dyn Surface>,
    pub manager: Arc<DryRun>,
    pub data: Arc<LogStore>,
    pub store: Store,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_surface(FakeSurface::default())
    }

    pub fn with_surface(fake: FakeSurface) -> Self {
        let fake = Arc::new(fake);
        let surface: Arc<dyn Surface> = fake.clone();
        let manager = Arc::new(DryRun::default());
        let data = Arc::new(LogStore::default());
        let state = StateInfo::new(Config::default(), manager.clone(), data.clone());
        Self {
            fake,
            surface,
            manager,
            data,
            store: Store::new(Arc::new(state)),
        }
    }
}

/// Let spawned tasks run until they block
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}
