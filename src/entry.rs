// SPDX-License-Identifier: GPL-3.0-only

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde::Deserialize;

use crate::{AppId, Result};

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum EntryIcon {
    Stock(String),
    Local(String),
    Remote(String),
}

/// One concrete installable or removable unit of a group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    pub id: AppId,
    pub unique_id: String,
    pub title: String,
    pub source_name: String,
    pub installed: bool,
    /// Already part of a pending transaction
    pub holding: bool,
    pub donation_url: Option<String>,
    pub icon: Option<EntryIcon>,
    pub addons: Vec<AppId>,
}

impl Entry {
    pub fn has_addons(&self) -> bool {
        !self.addons.is_empty()
    }
}

/// Predicate used to narrow down the entries of a group.
pub type EntryTest = fn(&Entry) -> bool;

pub fn is_support(entry: &Entry) -> bool {
    entry.donation_url.is_some()
}

pub fn has_addons(entry: &Entry) -> bool {
    entry.has_addons()
}

/// A logical package identity backed by one or more entries.
///
/// Groups are owned by the data model. They are only ever read here.
#[async_trait]
pub trait EntryGroup: fmt::Debug + Send + Sync {
    fn id(&self) -> &AppId;
    fn title(&self) -> &str;
    fn installable(&self) -> usize;
    fn removable(&self) -> usize;

    /// Load every entry of the group from its backing store.
    async fn materialize_entries(&self) -> Result<Vec<Arc<Entry>>>;
}
