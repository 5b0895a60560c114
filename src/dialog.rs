// SPDX-License-Identifier: GPL-3.0-only

//! Modal alert dialogs as plain data, plus the one-shot channel their answer
//! travels back on.
//!
//! A surface receives an [`AlertDialog`] together with a [`DialogResponder`].
//! The responder is consumed by [`DialogResponder::respond`], so a dialog can
//! only ever produce one response. Dropping the responder closes the dialog,
//! which resolves the waiting [`DialogFuture`] with the close response.

use std::collections::BTreeMap;

use tokio::sync::oneshot;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ResponseAppearance {
    #[default]
    Default,
    Suggested,
    Destructive,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DialogResponse {
    pub id: String,
    pub label: String,
    pub appearance: ResponseAppearance,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChoiceOption {
    pub title: String,
    pub subtitle: Option<String>,
}

/// An exclusive single-choice list embedded in a dialog.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChoiceList {
    pub id: String,
    pub options: Vec<ChoiceOption>,
    /// Index of the option that starts out selected
    pub selected: usize,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AlertDialog {
    pub heading: String,
    pub body: String,
    pub prefer_wide_layout: bool,
    pub responses: Vec<DialogResponse>,
    pub default_response: Option<String>,
    pub close_response: String,
    pub choices: Vec<ChoiceList>,
}

impl AlertDialog {
    pub fn new(heading: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            body: body.into(),
            close_response: "cancel".to_string(),
            ..Default::default()
        }
    }

    pub fn add_response(&mut self, id: &str, label: &str, appearance: ResponseAppearance) {
        self.responses.push(DialogResponse {
            id: id.to_string(),
            label: label.to_string(),
            appearance,
        });
    }

    pub fn has_response(&self, id: &str) -> bool {
        self.responses.iter().any(|response| response.id == id)
    }

    pub fn choice(&self, id: &str) -> Option<&ChoiceList> {
        self.choices.iter().find(|choice| choice.id == id)
    }

    /// Outcome of activating `response` with every choice list left at its
    /// initial selection
    pub fn outcome(&self, response: &str) -> DialogOutcome {
        DialogOutcome {
            response: response.to_string(),
            selections: self
                .choices
                .iter()
                .map(|choice| (choice.id.clone(), choice.selected))
                .collect(),
        }
    }

    /// Selected index of a choice list, falling back to its initial selection
    /// when the outcome has none or an out of range one
    pub fn selected(&self, outcome: &DialogOutcome, id: &str) -> Option<usize> {
        let choice = self.choice(id)?;
        match outcome.selections.get(id) {
            Some(&index) if index < choice.options.len() => Some(index),
            _ => Some(choice.selected),
        }
    }

    /// Create the responder/future pair for presenting this dialog
    pub fn pending(&self) -> (DialogResponder, DialogFuture) {
        let (tx, rx) = oneshot::channel();
        (
            DialogResponder { tx },
            DialogFuture {
                rx,
                close_response: self.close_response.clone(),
            },
        )
    }
}

/// The terminal answer of a dialog.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DialogOutcome {
    pub response: String,
    pub selections: BTreeMap<String, usize>,
}

impl DialogOutcome {
    pub fn select(mut self, choice: &str, index: usize) -> Self {
        self.selections.insert(choice.to_string(), index);
        self
    }
}

#[derive(Debug)]
pub struct DialogResponder {
    tx: oneshot::Sender<DialogOutcome>,
}

impl DialogResponder {
    pub fn respond(self, outcome: DialogOutcome) {
        if self.tx.send(outcome).is_err() {
            log::debug!("dialog response arrived after its task went away");
        }
    }
}

#[derive(Debug)]
pub struct DialogFuture {
    rx: oneshot::Receiver<DialogOutcome>,
    close_response: String,
}

impl DialogFuture {
    /// Wait for the dialog to be answered. There is no timeout.
    pub async fn response(self) -> DialogOutcome {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => DialogOutcome {
                response: self.close_response,
                selections: BTreeMap::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialog() -> AlertDialog {
        let mut dialog = AlertDialog::new("Heading", "Body");
        dialog.add_response("cancel", "Cancel", ResponseAppearance::Default);
        dialog.add_response("remove", "Remove", ResponseAppearance::Destructive);
        dialog.choices.push(ChoiceList {
            id: "data".to_string(),
            options: vec![
                ChoiceOption {
                    title: "Keep".to_string(),
                    subtitle: None,
                },
                ChoiceOption {
                    title: "Delete".to_string(),
                    subtitle: None,
                },
            ],
            selected: 0,
        });
        dialog
    }

    #[tokio::test]
    async fn dropped_responder_closes() {
        let dialog = dialog();
        let (responder, future) = dialog.pending();
        drop(responder);
        assert_eq!(future.response().await.response, "cancel");
    }

    #[tokio::test]
    async fn response_carries_selection() {
        let dialog = dialog();
        let (responder, future) = dialog.pending();
        responder.respond(dialog.outcome("remove").select("data", 1));
        let outcome = future.response().await;
        assert_eq!(outcome.response, "remove");
        assert_eq!(dialog.selected(&outcome, "data"), Some(1));
    }

    #[test]
    fn out_of_range_selection_uses_initial() {
        let dialog = dialog();
        let outcome = dialog.outcome("remove").select("data", 7);
        assert_eq!(dialog.selected(&outcome, "data"), Some(0));
        assert_eq!(dialog.selected(&outcome, "missing"), None);
    }
}
