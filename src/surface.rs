// SPDX-License-Identifier: GPL-3.0-only

use std::sync::{Arc, Weak};

use crate::{
    AppId, Entry, EntryIcon, Error, Result,
    dialog::{AlertDialog, DialogResponder},
};

/// Widgets a comet can fly between.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Anchor {
    /// A caller supplied widget, such as the button that was pressed
    Widget(String),
    NavigationRoot,
    TransactionsToggle,
    TransactionsSidebarToggle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

/// Decorative icon flight between two anchors.
#[derive(Clone, Debug, PartialEq)]
pub struct Comet {
    pub from: Anchor,
    pub to: Anchor,
    pub icon: EntryIcon,
    /// Pulse color, `None` uses the default accent
    pub pulse: Option<Rgba>,
}

/// The window a transaction flow reports to.
///
/// Every method must return promptly: dialogs are answered later through the
/// responder, and comets and URIs are fire-and-forget.
pub trait Surface: Send + Sync {
    fn add_toast(&self, message: &str);
    fn show_error(&self, message: &str);
    fn present(&self, dialog: AlertDialog, responder: DialogResponder);
    fn sidebar_shown(&self) -> bool;
    fn prefers_dark(&self) -> bool;
    fn spawn_comet(&self, comet: Comet);
    fn launch_uri(&self, uri: &str);
    fn present_addons(&self, entry: Arc<Entry>, addons: Vec<AppId>);
}

/// Weak back-reference to a surface.
///
/// Tasks hold this instead of the surface itself and upgrade it at start and
/// after every suspension, so a destroyed window is never kept alive.
#[derive(Clone)]
pub struct SurfaceHandle(Weak<dyn Surface>);

impl SurfaceHandle {
    pub fn new(surface: &Arc<dyn Surface>) -> Self {
        Self(Arc::downgrade(surface))
    }

    pub fn upgrade(&self) -> Result<Arc<dyn Surface>> {
        self.0.upgrade().ok_or(Error::SurfaceGone)
    }

    /// Show an error on the surface if it should be user visible, otherwise
    /// just log it
    pub fn report(&self, err: &Error) {
        if !err.is_user_visible() {
            log::debug!("not reporting {}", err);
            return;
        }
        match self.upgrade() {
            Ok(surface) => surface.show_error(&err.to_string()),
            Err(_) => log::warn!("no surface to report error: {}", err),
        }
    }
}

impl std::fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SurfaceHandle")
            .field(&(self.0.strong_count() > 0))
            .finish()
    }
}
