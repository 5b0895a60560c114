// SPDX-License-Identifier: GPL-3.0-only

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use store_transact::{
    AppId, Config, EntryGroup, Error,
    backend::{self, DryRun},
    catalog::Catalog,
    console::ConsoleSurface,
    state::StateInfo,
    store::{Message, Store},
    surface::{Surface, SurfaceHandle},
    tile::{Tile, TileKind},
};

#[derive(Debug, Parser)]
#[command(version, about = "Install and remove apps from a catalog")]
struct Cli {
    /// TOML file listing the app groups and their entries
    #[arg(long)]
    catalog: PathBuf,
    /// How long each dry-run transaction takes
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List groups and their entries
    List,
    /// Install an app as from its details page
    Install { id: String },
    /// Remove an app as from its details page
    Remove { id: String },
    /// Remove an app as from its installed tile
    Uninstall { id: String },
    /// Install or remove an app as from its favorites tile
    Toggle { id: String },
    /// Install or remove one addon of an installed app
    Addon { id: String, unique_id: String },
    /// Open the donation page of an app
    Support { id: String },
    /// Show the addons of an installed app
    Addons { id: String },
    /// Apply every available update
    UpdateAll,
}

fn group(catalog: &Catalog, id: &str) -> Result<Arc<dyn EntryGroup>, Error> {
    let group: Arc<dyn EntryGroup> = catalog
        .group(&AppId::new(id))
        .ok_or_else(|| Error::NotFound(format!("No app with id {}", id)))?;
    Ok(group)
}

fn list(catalog: &Catalog) {
    for group in catalog.groups() {
        println!(
            "{} ({}): {} installable, {} installed",
            group.title(),
            group.id(),
            group.installable(),
            group.removable()
        );
        for entry in group.entries() {
            let mut flags = Vec::new();
            if entry.installed {
                flags.push("installed");
            }
            if entry.holding {
                flags.push("holding");
            }
            if entry.has_addons() {
                flags.push("addons");
            }
            println!("  {} [{}]", entry.unique_id, flags.join(", "));
        }
    }
}

async fn command(
    command: Command,
    catalog: &Catalog,
    state: &Arc<StateInfo>,
    surface: &Arc<dyn Surface>,
    tx: mpsc::UnboundedSender<Message>,
) -> Result<(), Error> {
    let tile = |kind, id: &str| -> Result<Tile, Error> {
        Ok(Tile::new(
            kind,
            group(catalog, id)?,
            state.clone(),
            SurfaceHandle::new(surface),
            tx.clone(),
        ))
    };
    let send = |message| tx.send(message).map_err(|_| Error::SurfaceGone);

    match command {
        Command::List => list(catalog),
        Command::Install { id } => send(Message::FullViewInstall {
            group: group(catalog, &id)?,
            source: None,
        })?,
        Command::Remove { id } => send(Message::FullViewRemove {
            group: group(catalog, &id)?,
            source: None,
        })?,
        Command::Uninstall { id } => tile(TileKind::Installed, &id)?.remove().await?,
        Command::Toggle { id } => tile(TileKind::Favorite, &id)?.install_remove().await?,
        Command::Addon { id, unique_id } => {
            let addon = catalog
                .entry(&unique_id)
                .ok_or_else(|| Error::NotFound(format!("No entry {}", unique_id)))?;
            tile(TileKind::Installed, &id)?.addon_transact(addon)?;
        }
        Command::Support { id } => {
            tile(TileKind::Favorite, &id)?.support().await?;
        }
        Command::Addons { id } => {
            tile(TileKind::Installed, &id)?.addons().await?;
        }
        Command::UpdateAll => send(Message::UpdateAll(catalog.updates().to_vec()))?,
    }
    Ok(())
}

async fn run(cli: Cli, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let manager = Arc::new(DryRun::new(Duration::from_millis(cli.delay_ms)));
    let data_store = backend::data_store(&config);
    let state = Arc::new(StateInfo::new(config, manager.clone(), data_store));

    state.busy.set_busy(true);
    let catalog = Catalog::load(&cli.catalog);
    state.busy.set_busy(false);
    let catalog = catalog?;
    log::info!("loaded {} groups", catalog.groups().len());

    let surface: Arc<dyn Surface> = Arc::new(ConsoleSurface::default());
    let store = Store::new(state.clone());
    let (tx, rx) = mpsc::unbounded_channel();
    let (res, ()) = tokio::join!(
        command(cli.command, &catalog, &state, &surface, tx),
        store.run(SurfaceHandle::new(&surface), rx)
    );
    // User visible errors were already shown on the surface
    if let Err(err) = res {
        log::info!("{}", err);
    }

    for transaction in manager.finished() {
        println!("{}", transaction.completed_text());
    }
    log::debug!("{:?}", store.transactions_status());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::load_or_default(Config::path().as_deref());

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, config))
}
