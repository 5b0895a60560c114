// SPDX-License-Identifier: GPL-3.0-only

use std::{fmt, sync::Arc};

use crate::{AppId, Entry};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    Install,
    Remove,
}

impl Direction {
    /// Name of the dialog response that confirms this direction
    pub fn response(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Remove => "remove",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Install => "installed",
            Self::Remove => "removed",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.response())
    }
}

/// A confirmed user intent, consumed by the dispatcher.
#[derive(Clone, Debug)]
pub struct TransactionRequest {
    pub entry: Arc<Entry>,
    pub direction: Direction,
    pub delete_user_data: bool,
    /// Group or entry id that user data is reaped by
    pub reap_id: AppId,
}

/// A batch submitted to the transaction manager.
///
/// The constructors keep install and remove exclusive: a transaction is
/// either a single install, a single removal or a batch of updates.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    installs: Vec<Arc<Entry>>,
    updates: Vec<Arc<Entry>>,
    removes: Vec<Arc<Entry>>,
}

impl Transaction {
    pub fn new(entry: Arc<Entry>, direction: Direction) -> Self {
        match direction {
            Direction::Install => Self {
                installs: vec![entry],
                updates: Vec::new(),
                removes: Vec::new(),
            },
            Direction::Remove => Self {
                installs: Vec::new(),
                updates: Vec::new(),
                removes: vec![entry],
            },
        }
    }

    pub fn update(entries: Vec<Arc<Entry>>) -> Self {
        Self {
            installs: Vec::new(),
            updates: entries,
            removes: Vec::new(),
        }
    }

    pub fn installs(&self) -> &[Arc<Entry>] {
        &self.installs
    }

    pub fn updates(&self) -> &[Arc<Entry>] {
        &self.updates
    }

    pub fn removes(&self) -> &[Arc<Entry>] {
        &self.removes
    }

    fn first(&self) -> Option<&Arc<Entry>> {
        self.installs
            .first()
            .or_else(|| self.removes.first())
            .or_else(|| self.updates.first())
    }

    fn subject(&self) -> String {
        match (self.first(), self.updates.len()) {
            (Some(entry), n) if n <= 1 => {
                if entry.source_name.is_empty() {
                    entry.title.clone()
                } else {
                    format!("{} from {}", entry.title, entry.source_name)
                }
            }
            (_, n) => format!("{} apps", n),
        }
    }

    pub fn pending_text(&self, progress: i32) -> String {
        //TODO: translate
        let verb = if !self.installs.is_empty() {
            "Installing"
        } else if !self.removes.is_empty() {
            "Removing"
        } else {
            "Updating"
        };
        format!("{} {} ({}%)...", verb, self.subject(), progress)
    }

    pub fn completed_text(&self) -> String {
        //TODO: translate
        let verb = if !self.installs.is_empty() {
            "Installed"
        } else if !self.removes.is_empty() {
            "Removed"
        } else {
            "Updated"
        };
        format!("{} {}", verb, self.subject())
    }

    pub fn failed_dialog(&self, err: &str) -> (String, String) {
        //TODO: translate
        let verb = if !self.installs.is_empty() {
            "install"
        } else if !self.removes.is_empty() {
            "remove"
        } else {
            "update"
        };
        let ids = self
            .installs
            .iter()
            .chain(self.removes.iter())
            .chain(self.updates.iter())
            .map(|entry| entry.unique_id.as_str())
            .collect::<Vec<_>>();
        (
            format!("Failed to {verb} {}", self.subject()),
            format!("Failed to {verb} {:?}:\n{err}", ids),
        )
    }
}
