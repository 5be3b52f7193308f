// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`BootConfig`], the settings of the boot menu.
//!
//! Settings are UEFI variables in the [`BOOTMENU_VENDOR`] namespace. All of them are optional:
//!
//! | variable          | type    | meaning                                                         |
//! |-------------------|---------|-----------------------------------------------------------------|
//! | `WatchdogTimeout` | `usize` | seconds before a launched image that hangs resets the system    |
//! | `Verbose`         | `bool`  | log at `Info` level instead of `Warn`                           |
//!
//! [`BOOTMENU_VENDOR`]: crate::system::variable::BOOTMENU_VENDOR

use log::{LevelFilter, warn};
use uefi::{CStr16, cstr16};

use crate::{
    BootResult,
    error::BootError,
    system::{
        variable::{VarError, VariableSource, get_variable},
        watchdog::DEFAULT_WATCHDOG_TIMEOUT,
    },
};

/// The name of the watchdog timeout setting.
const WATCHDOG_TIMEOUT: &CStr16 = cstr16!("WatchdogTimeout");

/// The name of the verbosity setting.
const VERBOSE: &CStr16 = cstr16!("Verbose");

/// The settings of the boot menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootConfig {
    /// The watchdog timeout in seconds, armed while a boot entry is launched.
    pub watchdog_timeout: usize,

    /// Log informational messages as well as warnings.
    pub verbose: bool,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            watchdog_timeout: DEFAULT_WATCHDOG_TIMEOUT,
            verbose: false,
        }
    }
}

impl BootConfig {
    /// Reads a new [`BootConfig`] from a [`VariableSource`].
    ///
    /// A missing or zero `WatchdogTimeout` keeps the default. A setting that cannot be read, or has the wrong
    /// size, is ignored with a warning, and its default is used instead.
    #[must_use = "Has no effect if the result is unused"]
    pub fn new(source: &impl VariableSource) -> Self {
        let mut config = Self::default();

        match read_watchdog_timeout(source) {
            Ok(0) => (),
            Ok(timeout) => config.watchdog_timeout = timeout,
            Err(e) => warn!("Ignoring WatchdogTimeout setting: {e}"),
        }

        match get_variable::<bool>(source, VERBOSE, None) {
            Ok(verbose) => config.verbose = verbose,
            Err(e) => warn!("Ignoring Verbose setting: {e}"),
        }

        config
    }

    /// Returns the log level matching the settings.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        }
    }
}

/// Reads the watchdog timeout, stored either as a native `usize` or as a 4 byte integer.
///
/// # Errors
///
/// May return an `Error` if the variable could not be read, or has any other size.
fn read_watchdog_timeout(source: &impl VariableSource) -> BootResult<usize> {
    match get_variable::<usize>(source, WATCHDOG_TIMEOUT, None) {
        Err(BootError::VarError(VarError::SizeMismatch { actual: 4, .. })) => {
            let timeout = get_variable::<u32>(source, WATCHDOG_TIMEOUT, None)?;
            Ok(usize::try_from(timeout).unwrap_or(usize::MAX))
        }
        result => result,
    }
}
