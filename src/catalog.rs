// SPDX-License-Identifier: GPL-3.0-only

use std::{fs, path::Path, sync::Arc};

use async_trait::async_trait;
use serde::Deserialize;

use crate::{AppId, Entry, EntryGroup, EntryIcon, Error, Result};

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default, rename = "group")]
    groups: Vec<RawGroup>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    id: AppId,
    title: String,
    #[serde(default, rename = "entry")]
    entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    unique_id: String,
    id: Option<AppId>,
    title: Option<String>,
    #[serde(default)]
    source_name: String,
    #[serde(default)]
    installed: bool,
    #[serde(default)]
    holding: bool,
    #[serde(default)]
    update_available: bool,
    donation_url: Option<String>,
    icon: Option<EntryIcon>,
    #[serde(default)]
    addons: Vec<AppId>,
}

/// An entry group whose entries are already in memory.
#[derive(Debug)]
pub struct CatalogGroup {
    id: AppId,
    title: String,
    entries: Vec<Arc<Entry>>,
}

impl CatalogGroup {
    pub fn new(id: AppId, title: &str, entries: Vec<Entry>) -> Self {
        Self {
            id,
            title: title.to_string(),
            entries: entries.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn entries(&self) -> &[Arc<Entry>] {
        &self.entries
    }
}

#[async_trait]
impl EntryGroup for CatalogGroup {
    fn id(&self) -> &AppId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn installable(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.installed).count()
    }

    fn removable(&self) -> usize {
        self.entries.iter().filter(|entry| entry.installed).count()
    }

    async fn materialize_entries(&self) -> Result<Vec<Arc<Entry>>> {
        Ok(self.entries.clone())
    }
}

/// Groups and available updates read from a TOML file.
#[derive(Debug, Default)]
pub struct Catalog {
    groups: Vec<Arc<CatalogGroup>>,
    updates: Vec<Arc<Entry>>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        let raw: RawCatalog = toml::from_str(&data).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawCatalog) -> Self {
        let mut groups = Vec::with_capacity(raw.groups.len());
        let mut updates = Vec::new();
        for raw_group in raw.groups {
            let mut entries = Vec::with_capacity(raw_group.entries.len());
            for raw_entry in raw_group.entries {
                let entry = Arc::new(Entry {
                    id: raw_entry.id.unwrap_or_else(|| raw_group.id.clone()),
                    unique_id: raw_entry.unique_id,
                    title: raw_entry.title.unwrap_or_else(|| raw_group.title.clone()),
                    source_name: raw_entry.source_name,
                    installed: raw_entry.installed,
                    holding: raw_entry.holding,
                    donation_url: raw_entry.donation_url,
                    icon: raw_entry.icon,
                    addons: raw_entry.addons,
                });
                if raw_entry.update_available && entry.installed {
                    updates.push(entry.clone());
                }
                entries.push(entry);
            }
            groups.push(Arc::new(CatalogGroup {
                id: raw_group.id,
                title: raw_group.title,
                entries,
            }));
        }
        groups.sort_by(|a, b| lexical_sort::natural_lexical_cmp(&a.title, &b.title));
        Self { groups, updates }
    }

    pub fn groups(&self) -> &[Arc<CatalogGroup>] {
        &self.groups
    }

    pub fn group(&self, id: &AppId) -> Option<Arc<CatalogGroup>> {
        self.groups.iter().find(|group| &group.id == id).cloned()
    }

    /// Find any entry, including addons listed as their own groups
    pub fn entry(&self, unique_id: &str) -> Option<Arc<Entry>> {
        self.groups
            .iter()
            .flat_map(|group| group.entries.iter())
            .find(|entry| entry.unique_id == unique_id)
            .cloned()
    }

    pub fn updates(&self) -> &[Arc<Entry>] {
        &self.updates
    }
}
