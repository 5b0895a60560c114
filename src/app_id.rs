// SPDX-License-Identifier: GPL-3.0-only

use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// Identity shared by an entry group and all of its entries.
///
/// Groups are often keyed by their desktop file while entries carry the bare
/// package id, so `org.gnome.Maps.desktop` and `org.gnome.Maps` are the same
/// app. Equality, hashing and the user data directory all use that common
/// form, which keeps a reap keyed by the group id and one keyed by an entry id
/// pointing at the same directory.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AppId(String);

impl AppId {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// The id as the catalog or backend spelled it
    pub fn raw(&self) -> &str {
        &self.0
    }

    pub fn normalized(&self) -> &str {
        self.0.trim_end_matches(".desktop")
    }

    /// Name of the per-app user data directory, `None` if the id could point
    /// outside of its parent directory
    pub fn data_dir_name(&self) -> Option<&str> {
        match self.normalized() {
            "" | "." | ".." => None,
            name if name.contains(['/', '\\']) => None,
            name => Some(name),
        }
    }
}

impl From<&str> for AppId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.normalized())
    }
}

impl PartialEq for AppId {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for AppId {}

impl Hash for AppId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}
