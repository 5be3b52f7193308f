// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The firmware watchdog timer.
//!
//! The watchdog resets the system if it is not disarmed in time. It is armed right before an image is loaded, so a
//! boot target that hangs before taking over the machine does not leave it stuck forever. [`WatchdogGuard`] ties
//! the disarm to a scope, so it happens on every path that returns control to the menu.

use log::{error, warn};
use thiserror::Error;
use uefi::{CStr16, Status, boot, cstr16};

use crate::system::image::UefiServices;

/// The default watchdog timeout in seconds.
///
/// This is the same five minutes that the firmware's own boot manager arms before starting a boot option.
pub const DEFAULT_WATCHDOG_TIMEOUT: usize = 300;

/// The watchdog code passed to the firmware. Codes up to `0xFFFF` are reserved for firmware use.
pub const WATCHDOG_CODE: u64 = 0x1_0000;

/// The label recorded with the watchdog when it fires.
const WATCHDOG_LABEL: &CStr16 = cstr16!("bootmenu-rs launch");

/// An `Error` that may result from setting the watchdog.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogError {
    /// The watchdog could not be armed.
    #[error("Failed to arm watchdog timer: {0}")]
    Arm(Status),

    /// The watchdog could not be disarmed.
    #[error("Failed to disarm watchdog timer: {0}")]
    Disarm(Status),
}

/// A watchdog timer.
pub trait Watchdog {
    /// Sets the watchdog to fire after `timeout` seconds. A timeout of zero disarms it.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the firmware rejected the timer.
    fn set_watchdog(&self, timeout: usize, code: u64, label: &CStr16) -> uefi::Result;
}

impl Watchdog for UefiServices {
    fn set_watchdog(&self, timeout: usize, code: u64, label: &CStr16) -> uefi::Result {
        let mut data = label.to_u16_slice_with_nul().to_vec();
        boot::set_watchdog_timer(timeout, code, Some(&mut data))
    }
}

/// An armed watchdog that is disarmed when dropped.
///
/// If arming fails, the guard is inert: a warning is logged, the launch goes on without the watchdog, and no
/// disarm is issued.
pub struct WatchdogGuard<'a, W: Watchdog + ?Sized> {
    /// The watchdog to disarm.
    watchdog: &'a W,

    /// Whether the watchdog is currently armed by this guard.
    armed: bool,
}

impl<'a, W: Watchdog + ?Sized> WatchdogGuard<'a, W> {
    /// Arms the watchdog for `timeout` seconds.
    ///
    /// A timeout of zero leaves the watchdog untouched.
    pub fn arm(watchdog: &'a W, timeout: usize) -> Self {
        let armed = timeout > 0
            && match watchdog.set_watchdog(timeout, WATCHDOG_CODE, WATCHDOG_LABEL) {
                Ok(()) => true,
                Err(e) => {
                    warn!("{}, launching without it", WatchdogError::Arm(e.status()));
                    false
                }
            };
        Self { watchdog, armed }
    }

    /// Checks if the watchdog is armed by this guard.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Disarms the watchdog now, instead of when the guard is dropped.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the firmware refused to disarm the watchdog.
    pub fn disarm(mut self) -> Result<(), WatchdogError> {
        self.disarm_inner()
    }

    /// Disarms the watchdog if it is armed, at most once.
    fn disarm_inner(&mut self) -> Result<(), WatchdogError> {
        if !core::mem::replace(&mut self.armed, false) {
            return Ok(());
        }
        self.watchdog
            .set_watchdog(0, WATCHDOG_CODE, WATCHDOG_LABEL)
            .map_err(|e| WatchdogError::Disarm(e.status()))
    }
}

impl<W: Watchdog + ?Sized> Drop for WatchdogGuard<'_, W> {
    fn drop(&mut self) {
        if let Err(e) = self.disarm_inner() {
            error!("{e}");
        }
    }
}
