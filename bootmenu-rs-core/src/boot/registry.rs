// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`Registry`], the bounded list of boot entries shown in the menu.
//!
//! The registry is filled once at startup from `BootOrder`. A record that cannot be read or decoded is skipped
//! with a warning, and does not stop the rest of the scan.

use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use log::warn;
use thiserror::Error;
use tinyvec::ArrayVec;
use uefi::runtime::VariableVendor;

use crate::{
    BootResult,
    boot::entry::BootEntry,
    error::BootError,
    load_option::boot_order,
    system::variable::{BOOT_ORDER, VariableSource, boot_option_name},
};

/// The maximum amount of boot entries held by a [`Registry`].
pub const REGISTRY_CAPACITY: usize = 15;

/// An `Error` that may result from adding an entry to the [`Registry`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry already holds [`REGISTRY_CAPACITY`] entries.
    #[error("Boot{0:04X} was not added, the registry is full ({max} entries)", max = REGISTRY_CAPACITY)]
    CapacityExceeded(u16),
}

/// A problem found while scanning boot entries that did not stop the scan.
#[derive(Debug)]
pub struct ScanWarning {
    /// The boot option number the problem occurred with.
    pub id: u16,

    /// The problem.
    pub error: BootError,
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Boot{:04X}: {}", self.id, self.error)
    }
}

/// The result of [`Registry::scan`].
#[derive(Default)]
pub struct ScanReport {
    /// The entries that were registered.
    pub registry: Registry,

    /// The entries that were skipped, and why.
    pub warnings: Vec<ScanWarning>,
}

/// An ordered, fixed capacity list of [`BootEntry`].
#[derive(Default)]
pub struct Registry {
    /// The entries, in `BootOrder` order.
    entries: ArrayVec<[BootEntry; REGISTRY_CAPACITY]>,
}

impl Registry {
    /// Creates a new, empty [`Registry`].
    #[must_use = "Has no effect if the result is unused"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `BootOrder`, then registers every `Boot####` record it lists.
    ///
    /// Records that are missing, unreadable, or malformed are skipped. Once the registry is full, the scan stops
    /// and the entries already registered are kept. Every skipped record is logged and returned in the report.
    ///
    /// # Errors
    ///
    /// May return an `Error` if `BootOrder` itself could not be read.
    pub fn scan(source: &impl VariableSource) -> BootResult<ScanReport> {
        let order = source.get_variable(BOOT_ORDER, &VariableVendor::GLOBAL_VARIABLE)?;

        let mut report = ScanReport::default();
        for (source_index, id) in boot_order(&order).into_iter().enumerate() {
            let result = read_record(source, id)
                .and_then(|raw| report.registry.register(id, raw, source_index));

            match result {
                Ok(_) => (),
                Err(error @ BootError::RegistryError(_)) => {
                    warn!("{error}");
                    report.warnings.push(ScanWarning { id, error });
                    break;
                }
                Err(error) => {
                    warn!("Skipping Boot{id:04X}: {error}");
                    report.warnings.push(ScanWarning { id, error });
                }
            }
        }

        Ok(report)
    }

    /// Decodes a record, then appends it to the registry. Returns the index of the new entry.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the record could not be decoded, or the registry is full.
    pub fn register(&mut self, id: u16, raw: Box<[u8]>, source_index: usize) -> BootResult<usize> {
        let entry = BootEntry::new(id, raw, source_index)?;
        self.push(entry)?;
        Ok(self.entries.len() - 1)
    }

    /// Appends an already decoded entry to the registry.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the registry is full. The entry is dropped in that case.
    pub fn push(&mut self, entry: BootEntry) -> Result<(), RegistryError> {
        match self.entries.try_push(entry) {
            None => Ok(()),
            Some(entry) => Err(RegistryError::CapacityExceeded(entry.id())),
        }
    }

    /// Returns the entry at an index.
    ///
    /// # Panics
    ///
    /// Will panic if `i` is not less than [`Self::len`]. Callers must check the length first.
    #[must_use = "Has no effect if the result is unused"]
    pub fn get(&self, i: usize) -> &BootEntry {
        &self.entries[i]
    }

    /// Returns the amount of entries.
    #[must_use = "Has no effect if the result is unused"]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if there are no entries.
    #[must_use = "Has no effect if the result is unused"]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the entries, in order.
    pub fn iter(&self) -> core::slice::Iter<'_, BootEntry> {
        self.entries.iter()
    }

    /// Releases every entry and its buffer. Returns how many were released.
    ///
    /// This also happens when the registry is dropped.
    pub fn release_all(&mut self) -> usize {
        let released = self.entries.len();
        self.entries.clear();
        released
    }
}

/// Reads the raw record of a boot option from the global variable namespace.
///
/// # Errors
///
/// May return an `Error` if the variable does not exist, or could not be read.
fn read_record(source: &impl VariableSource, id: u16) -> BootResult<Box<[u8]>> {
    let name = boot_option_name(id)?;
    Ok(source.get_variable(&name, &VariableVendor::GLOBAL_VARIABLE)?)
}

#[cfg(test)]
pub(crate) mod tests {
    use alloc::{format, string::String};

    use uefi::Status;

    use crate::{
        load_option::{
            DecodeError,
            device_path::tests::FILE_PATH_A,
            tests::{build_record, units},
        },
        system::variable::{VarError, tests::MockVariables},
    };

    use super::*;

    /// Builds the content of a `BootOrder` variable.
    pub(crate) fn order_bytes(order: &[u16]) -> Vec<u8> {
        order.iter().flat_map(|id| id.to_le_bytes()).collect()
    }

    /// Builds a valid record with a label.
    pub(crate) fn record(label: &str) -> Vec<u8> {
        build_record(1, &units(label), &FILE_PATH_A, &[])
    }

    /// A variable store holding `BootOrder` and one record per label.
    pub(crate) fn store(entries: &[(u16, &str)]) -> MockVariables {
        let order: Vec<_> = entries.iter().map(|(id, _)| *id).collect();
        entries.iter().fold(
            MockVariables::default().with(
                VariableVendor::GLOBAL_VARIABLE,
                "BootOrder",
                &order_bytes(&order),
            ),
            |vars, (id, label)| {
                vars.with(
                    VariableVendor::GLOBAL_VARIABLE,
                    &format!("Boot{id:04X}"),
                    &record(label),
                )
            },
        )
    }

    #[test]
    fn test_capacity() {
        let mut registry = Registry::new();
        for i in 0..REGISTRY_CAPACITY {
            let id = u16::try_from(i).expect("Index does not fit u16 in test");
            let idx = registry
                .register(id, record("Entry").into_boxed_slice(), i)
                .expect("Failed to register entry below capacity in test");
            assert_eq!(idx, i);
        }

        let result = registry.register(0x10, record("One Too Many").into_boxed_slice(), 15);
        assert!(matches!(
            result,
            Err(BootError::RegistryError(RegistryError::CapacityExceeded(0x10)))
        ));
        assert_eq!(registry.len(), REGISTRY_CAPACITY);
    }

    #[test]
    fn test_skip_malformed() {
        let mut truncated = record("Broken");
        truncated.truncate(8);

        let vars = MockVariables::default()
            .with(
                VariableVendor::GLOBAL_VARIABLE,
                "BootOrder",
                &order_bytes(&[0x0001, 0x0002, 0x0003]),
            )
            .with(VariableVendor::GLOBAL_VARIABLE, "Boot0001", &record("First"))
            .with(VariableVendor::GLOBAL_VARIABLE, "Boot0002", &truncated)
            .with(VariableVendor::GLOBAL_VARIABLE, "Boot0003", &record("Third"));

        let report = Registry::scan(&vars).expect("Failed to scan in test");
        let labels: Vec<String> = report.registry.iter().map(BootEntry::label).collect();
        assert_eq!(labels, ["First", "Third"]);
        assert_eq!(report.registry.get(1).source_index(), 2);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].id, 0x0002);
        assert!(matches!(
            report.warnings[0].error,
            BootError::DecodeError(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn test_skip_missing_and_unreadable() {
        let vars = MockVariables::default()
            .with(
                VariableVendor::GLOBAL_VARIABLE,
                "BootOrder",
                &order_bytes(&[0x0001, 0x0002, 0x0003]),
            )
            .with_failing(
                VariableVendor::GLOBAL_VARIABLE,
                "Boot0001",
                Status::DEVICE_ERROR,
            )
            .with(VariableVendor::GLOBAL_VARIABLE, "Boot0003", &record("Third"));

        let report = Registry::scan(&vars).expect("Failed to scan in test");
        assert_eq!(report.registry.len(), 1);
        assert_eq!(report.registry.get(0).id(), 0x0003);
        assert_eq!(report.warnings.len(), 2);
        assert!(matches!(
            report.warnings[1].error,
            BootError::VarError(VarError::NotFound)
        ));
    }

    #[test]
    fn test_scan_stops_when_full() {
        let entries: Vec<(u16, String)> = (0..20u16).map(|id| (id, format!("Entry {id}"))).collect();
        let entries: Vec<(u16, &str)> = entries.iter().map(|(id, label)| (*id, label.as_str())).collect();

        let report = Registry::scan(&store(&entries)).expect("Failed to scan in test");
        assert_eq!(report.registry.len(), REGISTRY_CAPACITY);
        assert_eq!(report.registry.get(14).label(), "Entry 14");
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(
            format!("{}", report.warnings[0]),
            "Boot000F: Registry Error: Boot000F was not added, the registry is full (15 entries)"
        );
    }

    #[test]
    fn test_missing_boot_order() {
        let vars = MockVariables::default();
        assert!(matches!(
            Registry::scan(&vars),
            Err(BootError::VarError(VarError::NotFound))
        ));
    }

    #[test]
    fn test_release_all() {
        let mut report =
            Registry::scan(&store(&[(1, "A"), (2, "B")])).expect("Failed to scan in test");
        assert_eq!(report.registry.release_all(), 2);
        assert!(report.registry.is_empty());
        assert_eq!(report.registry.release_all(), 0);
    }
}
