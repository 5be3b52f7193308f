// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`BootMgr`], a struct which abstracts most of reading the firmware's boot entries.

use alloc::vec::Vec;

use crate::{
    BootResult,
    boot::{
        config::BootConfig,
        launcher::Launcher,
        registry::{Registry, ScanWarning},
    },
    system::{
        image::UefiServices,
        variable::{RuntimeVariables, VariableSource},
    },
};

pub mod action;
pub mod config;
pub mod entry;
pub mod launcher;
pub mod registry;

/// The boot entries and settings of the boot menu.
pub struct BootMgr {
    /// The configuration of the boot menu.
    pub boot_config: BootConfig,

    /// The boot entries.
    registry: Registry,

    /// The boot entries that were skipped while scanning.
    warnings: Vec<ScanWarning>,
}

impl BootMgr {
    /// Creates a new [`BootMgr`] from the firmware's variables.
    ///
    /// # Errors
    ///
    /// May return an `Error` if `BootOrder` could not be read.
    pub fn new() -> BootResult<Self> {
        Self::with_source(&RuntimeVariables)
    }

    /// Creates a new [`BootMgr`] from a [`VariableSource`].
    ///
    /// Boot entries that could not be read are skipped, and can be shown with [`Self::warnings`]. Settings that
    /// could not be read fall back to their defaults.
    ///
    /// # Errors
    ///
    /// May return an `Error` if `BootOrder` could not be read.
    pub fn with_source(source: &impl VariableSource) -> BootResult<Self> {
        let boot_config = BootConfig::new(source);
        let report = Registry::scan(source)?;

        Ok(Self {
            boot_config,
            registry: report.registry,
            warnings: report.warnings,
        })
    }

    /// Returns a reference to the inner [`Registry`].
    #[must_use = "Has no effect if the result is unused"]
    pub const fn list(&self) -> &Registry {
        &self.registry
    }

    /// Returns the problems found while scanning boot entries.
    #[must_use = "Has no effect if the result is unused"]
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Creates a [`Launcher`] using the firmware's boot services and the configured watchdog timeout.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn launcher(&self) -> Launcher<UefiServices> {
        Launcher::new(UefiServices, self.boot_config.watchdog_timeout)
    }

    /// Releases every boot entry. Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        self.warnings.clear();
        self.registry.release_all()
    }
}
