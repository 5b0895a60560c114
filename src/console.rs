// SPDX-License-Identifier: GPL-3.0-only

use std::{fmt::Write, io, sync::Arc};

use crate::{
    AppId, Entry,
    dialog::{AlertDialog, DialogOutcome, DialogResponder, ResponseAppearance},
    surface::{Comet, Surface},
};

/// Terminal stand-in for a store window.
///
/// Dialogs are printed to stdout and answered with one line on stdin, for
/// example `remove user-data=2`. Responses and options may also be given by
/// their 1-based number.
#[derive(Debug, Default)]
pub struct ConsoleSurface {
    pub dark: bool,
}

pub fn render(dialog: &AlertDialog) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "{}", dialog.heading);
    if !dialog.body.is_empty() {
        let _ = writeln!(s, "{}", dialog.body);
    }
    for choice in dialog.choices.iter() {
        let _ = writeln!(s, "  {}:", choice.id);
        for (i, option) in choice.options.iter().enumerate() {
            let mark = if i == choice.selected { '*' } else { ' ' };
            let _ = write!(s, "   {} {}. {}", mark, i + 1, option.title);
            match &option.subtitle {
                Some(subtitle) => {
                    let _ = writeln!(s, " ({})", subtitle);
                }
                None => {
                    let _ = writeln!(s);
                }
            }
        }
    }
    let responses = dialog
        .responses
        .iter()
        .enumerate()
        .map(|(i, response)| {
            let default = dialog.default_response.as_deref() == Some(response.id.as_str());
            format!(
                "{}. {}{}{}",
                i + 1,
                response.label,
                if response.appearance == ResponseAppearance::Destructive {
                    " (!)"
                } else {
                    ""
                },
                if default { " [default]" } else { "" }
            )
        })
        .collect::<Vec<_>>();
    let _ = write!(s, "[{}] > ", responses.join(", "));
    s
}

/// Parse one reply line into an outcome for `dialog`
pub fn parse_reply(dialog: &AlertDialog, line: &str) -> DialogOutcome {
    let mut words = line.split_whitespace();
    let response = match words.next() {
        Some(word) => match word.parse::<usize>() {
            Ok(number) => dialog
                .responses
                .get(number.wrapping_sub(1))
                .map(|response| response.id.clone())
                .unwrap_or_else(|| dialog.close_response.clone()),
            Err(_) => word.to_string(),
        },
        None => dialog
            .default_response
            .clone()
            .unwrap_or_else(|| dialog.close_response.clone()),
    };

    let mut outcome = dialog.outcome(&response);
    for word in words {
        let Some((id, value)) = word.split_once('=') else {
            log::warn!("ignoring {:?}, expected choice=number", word);
            continue;
        };
        match value.parse::<usize>() {
            Ok(number) if number > 0 => outcome = outcome.select(id, number - 1),
            _ => log::warn!("ignoring invalid selection {:?}", word),
        }
    }
    outcome
}

impl Surface for ConsoleSurface {
    fn add_toast(&self, message: &str) {
        println!("{}", message);
    }

    fn show_error(&self, message: &str) {
        eprintln!("error: {}", message);
    }

    fn present(&self, dialog: AlertDialog, responder: DialogResponder) {
        print!("{}", render(&dialog));
        let _ = io::Write::flush(&mut io::stdout());
        tokio::task::spawn_blocking(move || {
            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) => log::debug!("stdin closed, dismissing {:?}", dialog.heading),
                Ok(_) => responder.respond(parse_reply(&dialog, &line)),
                Err(err) => log::error!("failed to read reply: {}", err),
            }
        });
    }

    fn sidebar_shown(&self) -> bool {
        false
    }

    fn prefers_dark(&self) -> bool {
        self.dark
    }

    fn spawn_comet(&self, comet: Comet) {
        log::debug!("comet {:?}", comet);
    }

    fn launch_uri(&self, uri: &str) {
        println!("open {}", uri);
    }

    fn present_addons(&self, entry: Arc<Entry>, addons: Vec<AppId>) {
        println!("Addons for {}:", entry.title);
        for addon in addons {
            println!("  {}", addon);
        }
    }
}
