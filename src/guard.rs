// SPDX-License-Identifier: GPL-3.0-only

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{Error, Result, surface::Surface};

pub const BUSY_TOAST: &str = "Can't do that right now!";

/// Application-wide busy flag, handed to the flow as an explicit capability.
///
/// The check is best effort. The flag may flip right after a passing check and
/// that is accepted.
#[derive(Clone, Debug, Default)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl BusyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Relaxed)
    }

    pub fn set_busy(&self, busy: bool) {
        if self.busy.swap(busy, Ordering::Relaxed) != busy {
            log::info!("application busy: {}", busy);
        }
    }

    /// Fails with [`Error::Busy`] and shows a toast on `surface` if the
    /// application is busy
    pub fn check(&self, surface: &dyn Surface) -> Result<()> {
        if self.is_busy() {
            surface.add_toast(BUSY_TOAST);
            Err(Error::Busy)
        } else {
            Ok(())
        }
    }

    pub fn guard(&self, surface: &dyn Surface) -> bool {
        self.check(surface).is_ok()
    }
}
