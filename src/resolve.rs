// SPDX-License-Identifier: GPL-3.0-only

use std::{sync::Arc, time::Instant};

use crate::{
    Entry, EntryGroup, EntryTest, Error, Result,
    dialog::{AlertDialog, ResponseAppearance},
    surface::SurfaceHandle,
};

pub(crate) async fn materialize(group: &dyn EntryGroup) -> Result<Vec<Arc<Entry>>> {
    let start = Instant::now();
    let entries = group.materialize_entries().await?;
    log::info!(
        "materialized {} entries for {} in {:?}",
        entries.len(),
        group.id(),
        start.elapsed()
    );
    Ok(entries)
}

fn choose_installation_dialog(candidates: &[Arc<Entry>]) -> AlertDialog {
    let mut dialog = AlertDialog::new(
        "Choose an Installation",
        "You have multiple versions of this app installed. Which one would you like to proceed with?",
    );
    dialog.prefer_wide_layout = true;
    dialog.add_response("cancel", "Cancel", ResponseAppearance::Destructive);
    for candidate in candidates {
        dialog.add_response(
            &candidate.unique_id,
            &candidate.unique_id,
            ResponseAppearance::Default,
        );
    }
    dialog.default_response = candidates.first().map(|entry| entry.unique_id.clone());
    dialog
}

/// Find the single installed entry of `group` that passes `test`.
///
/// When several installed entries qualify the user is asked to pick one on
/// `surface`. Without a surface there is no way to choose and the lookup
/// fails with [`Error::NotFound`].
pub async fn find_entry(
    group: &dyn EntryGroup,
    test: Option<EntryTest>,
    surface: Option<&SurfaceHandle>,
) -> Result<Arc<Entry>> {
    let entries = materialize(group).await?;
    let mut candidates: Vec<Arc<Entry>> = entries
        .into_iter()
        .filter(|entry| entry.installed && test.is_none_or(|test| test(entry)))
        .collect();

    if candidates.len() == 1 {
        return Ok(candidates.remove(0));
    }
    let surface = match surface {
        Some(surface) if !candidates.is_empty() => surface,
        _ => {
            return Err(Error::NotFound(
                "No entry candidates satisfied this test condition".to_string(),
            ));
        }
    };

    let dialog = choose_installation_dialog(&candidates);
    let (responder, future) = dialog.pending();
    surface.upgrade()?.present(dialog, responder);
    let outcome = future.response().await;
    surface.upgrade()?;

    candidates
        .into_iter()
        .find(|entry| entry.unique_id == outcome.response)
        .ok_or(Error::UserCancelled)
}

/// Like [`find_entry`], but if no installed entry qualifies, fall back to the
/// first entry of the whole group that passes `test`.
pub async fn find_any_entry(
    group: &dyn EntryGroup,
    test: Option<EntryTest>,
    surface: Option<&SurfaceHandle>,
) -> Result<Arc<Entry>> {
    match find_entry(group, test, surface).await {
        Err(Error::NotFound(message)) => {
            log::debug!("{}, scanning all entries of {}", message, group.id());
        }
        res => return res,
    }

    let all_entries = materialize(group).await?;
    match test {
        None => all_entries
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound("No entries found in group".to_string())),
        Some(test) => all_entries
            .into_iter()
            .find(|entry| test(entry))
            .ok_or_else(|| Error::NotFound("No entry matching criteria found".to_string())),
    }
}
