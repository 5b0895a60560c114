// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use crate::{
    Direction, Entry, Error, Result,
    dialog::{
        AlertDialog, ChoiceList, ChoiceOption, DialogFuture, DialogOutcome, ResponseAppearance,
    },
    surface::SurfaceHandle,
};

pub const VARIANT_CHOICE: &str = "variant";
pub const USER_DATA_CHOICE: &str = "user-data";

const KEEP_DATA: usize = 0;
const DELETE_DATA: usize = 1;

/// Entries that are already part of a transaction, or whose install state
/// does not fit the direction, can't be picked.
pub fn should_skip_entry(entry: &Entry, direction: Direction) -> bool {
    if entry.holding {
        return true;
    }
    match direction {
        Direction::Install => entry.installed,
        Direction::Remove => !entry.installed,
    }
}

pub fn eligible_variants(entries: Vec<Arc<Entry>>, direction: Direction) -> Vec<Arc<Entry>> {
    entries
        .into_iter()
        .filter(|entry| !should_skip_entry(entry, direction))
        .collect()
}

/// What the user agreed to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Decision {
    pub direction: Direction,
    /// Index into the eligible variants, if any were offered
    pub variant: usize,
    pub delete_user_data: bool,
}

/// A confirmation dialog that has been built but not presented yet.
#[derive(Debug)]
pub struct ConfirmDialog {
    dialog: AlertDialog,
    direction: Direction,
    variants: usize,
}

impl ConfirmDialog {
    pub fn build(title: &str, direction: Direction, variants: &[Arc<Entry>]) -> Self {
        let mut dialog = match direction {
            Direction::Install => {
                let mut dialog = AlertDialog::new(
                    format!("Install {}?", title),
                    "May install additional shared components",
                );
                dialog.add_response("cancel", "Cancel", ResponseAppearance::Default);
                dialog.add_response("install", "Install", ResponseAppearance::Suggested);
                dialog
            }
            Direction::Remove => {
                let mut dialog = AlertDialog::new(
                    format!("Remove {}?", title),
                    format!(
                        "It will not be possible to use {} after it is uninstalled.",
                        title
                    ),
                );
                dialog.add_response("cancel", "Cancel", ResponseAppearance::Default);
                dialog.add_response("remove", "Remove", ResponseAppearance::Destructive);
                dialog
            }
        };
        dialog.default_response = Some(direction.response().to_string());
        dialog.close_response = "cancel".to_string();

        if variants.len() > 1 {
            dialog.choices.push(ChoiceList {
                id: VARIANT_CHOICE.to_string(),
                options: variants
                    .iter()
                    .map(|entry| ChoiceOption {
                        title: entry.unique_id.clone(),
                        subtitle: None,
                    })
                    .collect(),
                selected: 0,
            });
        }

        if direction == Direction::Remove {
            dialog.choices.push(ChoiceList {
                id: USER_DATA_CHOICE.to_string(),
                options: vec![
                    ChoiceOption {
                        title: "Keep Data".to_string(),
                        subtitle: Some("Allow restoring settings and content".to_string()),
                    },
                    ChoiceOption {
                        title: "Delete Data".to_string(),
                        subtitle: Some("Permanently remove app data to save space".to_string()),
                    },
                ],
                selected: KEEP_DATA,
            });
        }

        Self {
            dialog,
            direction,
            variants: variants.len(),
        }
    }

    pub fn dialog(&self) -> &AlertDialog {
        &self.dialog
    }

    /// Installs with at most one possible variant may skip the dialog.
    /// Removals never do, the user data choice has to be made.
    pub fn can_skip(&self, auto_confirm: bool) -> bool {
        auto_confirm && self.direction == Direction::Install && self.variants <= 1
    }

    /// Decision taken without asking
    pub fn skip(self) -> Decision {
        Decision {
            direction: self.direction,
            variant: 0,
            delete_user_data: false,
        }
    }

    pub fn present(self, surface: &SurfaceHandle) -> Result<AwaitingConfirm> {
        let (responder, future) = self.dialog.pending();
        surface.upgrade()?.present(self.dialog.clone(), responder);
        Ok(AwaitingConfirm {
            confirm: self,
            future,
        })
    }

    /// Turn the dialog's answer into a decision. Anything but the response
    /// for this dialog's direction counts as a cancellation.
    pub fn resolve(&self, outcome: &DialogOutcome) -> Result<Decision> {
        if outcome.response != self.direction.response() {
            if outcome.response != self.dialog.close_response {
                log::warn!("ignoring unknown dialog response {:?}", outcome.response);
            }
            return Err(Error::UserCancelled);
        }
        let variant = self.dialog.selected(outcome, VARIANT_CHOICE).unwrap_or(0);
        let delete_user_data = self.dialog.selected(outcome, USER_DATA_CHOICE) == Some(DELETE_DATA);
        Ok(Decision {
            direction: self.direction,
            variant,
            delete_user_data,
        })
    }
}

/// A presented confirmation dialog waiting for its single response.
#[derive(Debug)]
pub struct AwaitingConfirm {
    confirm: ConfirmDialog,
    future: DialogFuture,
}

impl AwaitingConfirm {
    pub async fn decision(self) -> Result<Decision> {
        let outcome = self.future.response().await;
        self.confirm.resolve(&outcome)
    }
}

/// Ask the user to confirm `direction` for `title`, or skip the question when
/// `auto_confirm` allows it.
pub async fn confirm(
    surface: &SurfaceHandle,
    title: &str,
    direction: Direction,
    variants: &[Arc<Entry>],
    auto_confirm: bool,
) -> Result<Decision> {
    let confirm = ConfirmDialog::build(title, direction, variants);
    if confirm.can_skip(auto_confirm) {
        log::debug!("auto confirming {} of {}", direction, title);
        return Ok(confirm.skip());
    }
    let decision = confirm.present(surface)?.decision().await;
    surface.upgrade()?;
    decision
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::AppId;

    fn entry(unique_id: &str, installed: bool, holding: bool) -> Arc<Entry> {
        Arc::new(Entry {
            id: AppId::new("org.example.App"),
            unique_id: unique_id.to_string(),
            title: "App".to_string(),
            source_name: String::new(),
            installed,
            holding,
            donation_url: None,
            icon: None,
            addons: Vec::new(),
        })
    }

    #[test]
    fn holding_entries_are_never_eligible() {
        let entries = vec![
            entry("a", false, true),
            entry("b", false, false),
            entry("c", true, false),
        ];
        let install = eligible_variants(entries.clone(), Direction::Install);
        assert_eq!(install.len(), 1);
        assert_eq!(install[0].unique_id, "b");

        let remove = eligible_variants(entries, Direction::Remove);
        assert_eq!(remove.len(), 1);
        assert_eq!(remove[0].unique_id, "c");
    }

    #[test]
    fn install_dialog_copy() {
        let confirm = ConfirmDialog::build("Maps", Direction::Install, &[]);
        let dialog = confirm.dialog();
        assert_eq!(dialog.heading, "Install Maps?");
        assert_eq!(dialog.body, "May install additional shared components");
        assert_eq!(dialog.default_response.as_deref(), Some("install"));
        assert_eq!(dialog.close_response, "cancel");
        assert!(dialog.choices.is_empty());
    }

    #[test]
    fn remove_dialog_always_has_user_data_choice() {
        let confirm = ConfirmDialog::build("Maps", Direction::Remove, &[]);
        let dialog = confirm.dialog();
        assert_eq!(dialog.heading, "Remove Maps?");
        assert_eq!(
            dialog.body,
            "It will not be possible to use Maps after it is uninstalled."
        );
        let remove = dialog
            .responses
            .iter()
            .find(|response| response.id == "remove")
            .map(|response| response.appearance);
        assert_eq!(remove, Some(ResponseAppearance::Destructive));
        let choice = dialog.choice(USER_DATA_CHOICE).map(|choice| choice.selected);
        assert_eq!(choice, Some(KEEP_DATA));
        assert!(!confirm.can_skip(true));
    }

    #[test]
    fn variant_list_only_with_several_variants() {
        let one = [entry("a", false, false)];
        let confirm = ConfirmDialog::build("App", Direction::Install, &one);
        assert!(confirm.dialog().choice(VARIANT_CHOICE).is_none());
        assert!(confirm.can_skip(true));
        assert!(!confirm.can_skip(false));

        let two = [entry("a", false, false), entry("b", false, false)];
        let confirm = ConfirmDialog::build("App", Direction::Install, &two);
        let titles: Vec<_> = confirm
            .dialog()
            .choice(VARIANT_CHOICE)
            .map(|choice| choice.options.iter().map(|o| o.title.clone()).collect())
            .unwrap_or_default();
        assert_eq!(titles, vec!["a".to_string(), "b".to_string()]);
        assert!(!confirm.can_skip(true));
    }

    #[test]
    fn resolve_reads_selections() {
        let two = [entry("a", true, false), entry("b", true, false)];
        let confirm = ConfirmDialog::build("App", Direction::Remove, &two);
        let outcome = confirm
            .dialog()
            .outcome("remove")
            .select(VARIANT_CHOICE, 1)
            .select(USER_DATA_CHOICE, DELETE_DATA);
        assert_eq!(
            confirm.resolve(&outcome).ok(),
            Some(Decision {
                direction: Direction::Remove,
                variant: 1,
                delete_user_data: true,
            })
        );
    }

    #[test]
    fn unknown_responses_cancel() {
        let confirm = ConfirmDialog::build("App", Direction::Remove, &[]);
        for response in ["cancel", "install", "bogus"] {
            let outcome = confirm.dialog().outcome(response);
            assert!(matches!(
                confirm.resolve(&outcome),
                Err(Error::UserCancelled)
            ));
        }
    }
}
