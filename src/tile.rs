// SPDX-License-Identifier: GPL-3.0-only

//! Actions behind the buttons of installed and favorite app tiles.
//!
//! Tiles never start transactions themselves. They resolve an entry and send
//! a [`Message`] to the store, which runs it through the usual flow. Actions
//! that may lead to a transaction pass the busy guard before resolving.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    Entry, EntryGroup, EntryTest, Error, Result,
    entry::{has_addons, is_support},
    resolve::{find_any_entry, find_entry},
    state::StateInfo,
    store::Message,
    surface::SurfaceHandle,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TileKind {
    Installed,
    Favorite,
}

pub struct Tile {
    kind: TileKind,
    group: Arc<dyn EntryGroup>,
    state: Arc<StateInfo>,
    surface: SurfaceHandle,
    tx: mpsc::UnboundedSender<Message>,
}

impl Tile {
    pub fn new(
        kind: TileKind,
        group: Arc<dyn EntryGroup>,
        state: Arc<StateInfo>,
        surface: SurfaceHandle,
        tx: mpsc::UnboundedSender<Message>,
    ) -> Self {
        Self {
            kind,
            group,
            state,
            surface,
            tx,
        }
    }

    fn check_busy(&self) -> Result<()> {
        self.state.busy.check(self.surface.upgrade()?.as_ref())
    }

    fn send(&self, message: Message) -> Result<()> {
        self.tx.send(message).map_err(|_| Error::SurfaceGone)
    }

    fn finish<T>(&self, res: Result<T>) -> Result<T> {
        if let Err(err) = &res {
            self.surface.report(err);
        }
        res
    }

    /// Entry lookup for this tile, favorites may pick entries that are not
    /// installed
    async fn lookup(&self, test: Option<EntryTest>) -> Result<Arc<Entry>> {
        match self.kind {
            TileKind::Installed => find_entry(self.group.as_ref(), test, Some(&self.surface)).await,
            TileKind::Favorite => {
                find_any_entry(self.group.as_ref(), test, Some(&self.surface)).await
            }
        }
    }

    /// Open the donation page of the app
    pub async fn support(&self) -> Result<String> {
        let res: Result<String> = async {
            let entry = self.lookup(Some(is_support)).await?;
            let url = entry
                .donation_url
                .clone()
                .ok_or_else(|| Error::NotFound("No donation link".to_string()))?;
            self.surface.upgrade()?.launch_uri(&url);
            Ok(url)
        }
        .await;
        self.finish(res)
    }

    /// Show the addons of the installed app
    pub async fn addons(&self) -> Result<Arc<Entry>> {
        let res: Result<Arc<Entry>> = async {
            let entry = find_entry(self.group.as_ref(), Some(has_addons), Some(&self.surface)).await?;
            self.surface
                .upgrade()?
                .present_addons(entry.clone(), entry.addons.clone());
            Ok(entry)
        }
        .await;
        self.finish(res)
    }

    /// Toggle an addon picked from the addons list
    pub fn addon_transact(&self, addon: Arc<Entry>) -> Result<()> {
        if addon.installed {
            self.send(Message::RemoveAddon(addon))
        } else {
            self.send(Message::InstallAddon(addon))
        }
    }

    /// Remove the app of an installed tile
    pub async fn remove(&self) -> Result<()> {
        let res: Result<()> = async {
            self.check_busy()?;
            let entry = find_entry(self.group.as_ref(), None, Some(&self.surface)).await?;
            self.send(Message::RemoveInstalled(entry))
        }
        .await;
        self.finish(res)
    }

    /// Install or remove the app of a favorite tile, depending on whether
    /// anything of it is installed
    pub async fn install_remove(&self) -> Result<()> {
        let res: Result<()> = async {
            self.check_busy()?;
            if self.group.removable() > 0 {
                let entry = find_entry(self.group.as_ref(), None, Some(&self.surface)).await?;
                self.send(Message::RemoveInstalled(entry))
            } else {
                let entry = find_any_entry(self.group.as_ref(), None, Some(&self.surface)).await?;
                self.send(Message::InstallEntry(entry))
            }
        }
        .await;
        self.finish(res)
    }

    /// Remove the app from the user's favorites.
    ///
    /// Returns false without doing anything if nobody is signed in.
    pub async fn unfavorite(&self) -> Result<bool> {
        let (Some(favorites), Some(token)) = (self.state.favorites(), self.state.auth_token())
        else {
            log::info!("not signed in, can't unfavorite {}", self.group.id());
            return Ok(false);
        };
        let res = favorites.remove_favorite(self.group.id(), &token).await;
        self.finish(res).map(|()| true)
    }
}
