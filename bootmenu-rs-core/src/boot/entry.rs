// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`BootEntry`], a decoded `Boot####` record together with the buffer it was decoded from.

use alloc::{boxed::Box, format, string::String};

use crate::load_option::{DecodeError, Layout, LoadOption};

/// One boot option read from the firmware.
///
/// The entry owns the raw record, and keeps the [`Layout`] computed when it was decoded. Views are rebuilt from
/// that layout, so the record is only scanned once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BootEntry {
    /// The boot option number, as found in `BootOrder`.
    id: u16,

    /// The record as read from the `Boot####` variable.
    raw: Box<[u8]>,

    /// The decoded field ranges of `raw`.
    layout: Layout,

    /// The position of the boot option number in `BootOrder`.
    source_index: usize,
}

impl BootEntry {
    /// Creates a new [`BootEntry`] by decoding a record.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the record is not a valid load option.
    pub fn new(id: u16, raw: Box<[u8]>, source_index: usize) -> Result<Self, DecodeError> {
        let layout = Layout::decode(&raw)?;
        Ok(Self {
            id,
            raw,
            layout,
            source_index,
        })
    }

    /// Returns the boot option number.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn id(&self) -> u16 {
        self.id
    }

    /// Returns the position of this entry's number in `BootOrder`.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn source_index(&self) -> usize {
        self.source_index
    }

    /// Returns the name of the variable this entry was read from.
    #[must_use = "Has no effect if the result is unused"]
    pub fn name(&self) -> String {
        format!("Boot{:04X}", self.id)
    }

    /// Returns the whole record.
    #[must_use = "Has no effect if the result is unused"]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Returns the decoded view of the record.
    #[must_use = "Has no effect if the result is unused"]
    pub fn option(&self) -> LoadOption<'_> {
        self.layout.view(&self.raw)
    }

    /// Returns the description of the entry.
    #[must_use = "Has no effect if the result is unused"]
    pub fn label(&self) -> String {
        self.option().label()
    }

    /// Returns the raw bytes of the file path list.
    #[must_use = "Has no effect if the result is unused"]
    pub fn file_path_list(&self) -> &[u8] {
        self.option().file_path_list()
    }

    /// Checks if the entry has anything to launch.
    #[must_use = "Has no effect if the result is unused"]
    pub fn is_launchable(&self) -> bool {
        self.option().has_file_path()
    }
}
