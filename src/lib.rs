// SPDX-License-Identifier: GPL-3.0-only

//! Confirmation and dispatch of install and remove requests for an app store.
//!
//! A request starts in the [`store`] as a [`store::Message`], passes the busy
//! [`guard`], is narrowed down to one entry by [`resolve`], confirmed by the
//! user through [`confirm`] and finally handed to the transaction manager by
//! [`dispatch`].

pub use app_id::AppId;
mod app_id;

pub use config::{AppTheme, Config, CONFIG_VERSION};
pub mod config;

pub use entry::{Entry, EntryGroup, EntryIcon, EntryTest};
pub mod entry;

pub use error::{Error, Result};
mod error;

pub use transaction::{Direction, Transaction, TransactionRequest};
mod transaction;

pub mod backend;
pub mod catalog;
pub mod confirm;
pub mod console;
pub mod dialog;
pub mod dispatch;
pub mod guard;
pub mod resolve;
pub mod state;
pub mod store;
pub mod surface;
pub mod tile;
