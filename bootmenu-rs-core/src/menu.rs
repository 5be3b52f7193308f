// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The selection state machine of the boot menu.
//!
//! A [`Menu`] borrows the [`Registry`] and tracks which entry is selected. Frontends only draw the menu and turn
//! key presses into [`Command`]s through the [`MenuFrontend`] trait. [`Menu::run`] does the rest.

use alloc::{format, string::String};
use core::fmt::Write;

use log::info;
use uefi::proto::console::text::{Key, ScanCode};

use crate::{
    BootResult,
    boot::{entry::BootEntry, launcher::Launcher, registry::Registry},
    error::BootError,
    load_option::device_path::DevicePathNodes,
    system::{helper::hex_dump, image::ImageService, watchdog::Watchdog},
};

/// A user command, decoded from a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Select the previous entry.
    MoveUp,

    /// Select the next entry.
    MoveDown,

    /// Show the details of the selected entry.
    Inspect,

    /// Launch the selected entry.
    Activate,

    /// Leave the menu.
    Quit,
}

impl Command {
    /// Decodes a key press. Returns `None` for keys without a command.
    #[must_use = "Has no effect if the result is unused"]
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Special(ScanCode::UP) => Some(Self::MoveUp),
            Key::Special(ScanCode::DOWN) => Some(Self::MoveDown),
            Key::Special(ScanCode::ESCAPE) => Some(Self::Quit),
            Key::Special(_) => None,
            Key::Printable(key) => match char::from(key).to_ascii_lowercase() {
                'k' | 'w' => Some(Self::MoveUp),
                'j' | 's' => Some(Self::MoveDown),
                '\r' | '\n' => Some(Self::Activate),
                'i' => Some(Self::Inspect),
                'q' => Some(Self::Quit),
                _ => None,
            },
        }
    }
}

/// What the menu should do after a [`Command`] was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Keep waiting for commands.
    Stay,

    /// Show the details of the entry at an index.
    Inspect(usize),

    /// Launch the entry at an index.
    Launch(usize),

    /// Leave the menu.
    Quit,
}

/// The index of the selected entry.
///
/// The index is always `0` for an empty list, otherwise it is less than the length of the list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// The selected index.
    index: usize,
}

impl Selection {
    /// Returns the selected index.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Selects the previous entry, stopping at the first.
    pub const fn move_up(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Selects the next entry, stopping at the last of `len` entries.
    pub const fn move_down(&mut self, len: usize) {
        if self.index + 1 < len {
            self.index += 1;
        }
    }

    /// Applies a command to a list of `len` entries.
    ///
    /// On an empty list, [`Command::Inspect`] and [`Command::Activate`] do nothing.
    pub const fn apply(&mut self, command: Command, len: usize) -> Transition {
        match command {
            Command::MoveUp => {
                self.move_up();
                Transition::Stay
            }
            Command::MoveDown => {
                self.move_down(len);
                Transition::Stay
            }
            Command::Inspect if len > 0 => Transition::Inspect(self.index),
            Command::Activate if len > 0 => Transition::Launch(self.index),
            Command::Inspect | Command::Activate => Transition::Stay,
            Command::Quit => Transition::Quit,
        }
    }
}

/// A frontend for the [`Menu`].
pub trait MenuFrontend {
    /// Draws the menu.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the console could not be written to.
    fn render(&mut self, menu: &Menu<'_>) -> BootResult<()>;

    /// Blocks until the user enters a command.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the input device failed.
    fn read_command(&mut self) -> BootResult<Command>;

    /// Shows the details of an entry, usually from [`dump_entry`].
    ///
    /// # Errors
    ///
    /// May return an `Error` if the console could not be written to.
    fn show_dump(&mut self, entry: &BootEntry) -> BootResult<()>;

    /// Shows an error, and waits for the user to acknowledge it.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the console could not be written to.
    fn report(&mut self, error: &BootError) -> BootResult<()>;
}

/// The boot menu over a [`Registry`].
pub struct Menu<'a> {
    /// The boot entries.
    registry: &'a Registry,

    /// The selected entry.
    selection: Selection,
}

impl<'a> Menu<'a> {
    /// Creates a new [`Menu`] with the first entry selected.
    #[must_use = "Has no effect if the result is unused"]
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            selection: Selection::default(),
        }
    }

    /// Returns the amount of entries.
    #[must_use = "Has no effect if the result is unused"]
    pub fn entry_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the label of the entry at an index.
    ///
    /// # Panics
    ///
    /// Will panic if `i` is not less than [`Self::entry_count`].
    #[must_use = "Has no effect if the result is unused"]
    pub fn entry_label(&self, i: usize) -> String {
        self.registry.get(i).label()
    }

    /// Returns the selected index.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn selected_index(&self) -> usize {
        self.selection.index()
    }

    /// Returns the file path list of the entry at an index.
    ///
    /// # Panics
    ///
    /// Will panic if `i` is not less than [`Self::entry_count`].
    #[must_use = "Has no effect if the result is unused"]
    pub fn file_path_bytes(&self, i: usize) -> &'a [u8] {
        self.registry.get(i).file_path_list()
    }

    /// Returns the entries of the menu.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Runs the menu until the user quits.
    ///
    /// A failed launch is reported through the frontend, then the menu continues. So does an image that ran and
    /// returned.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the frontend failed.
    pub fn run<F, S>(&mut self, frontend: &mut F, launcher: &mut Launcher<S>) -> BootResult<()>
    where
        F: MenuFrontend + ?Sized,
        S: ImageService + Watchdog,
    {
        loop {
            frontend.render(self)?;
            let command = frontend.read_command()?;

            match self.selection.apply(command, self.entry_count()) {
                Transition::Stay => (),
                Transition::Inspect(i) => frontend.show_dump(self.registry.get(i))?,
                Transition::Launch(i) => {
                    let entry = self.registry.get(i);
                    match launcher.launch(entry) {
                        Ok(()) => info!("{} returned to the menu", entry.name()),
                        Err(e) => frontend.report(&e.into())?,
                    }
                }
                Transition::Quit => return Ok(()),
            }
        }
    }
}

/// Formats the details of an entry for display.
///
/// This shows the decoded header fields, the device path node headers, and a hex dump of the file path list and
/// optional data.
#[must_use = "Has no effect if the result is unused"]
pub fn dump_entry(entry: &BootEntry) -> String {
    let option = entry.option();
    let mut out = format!("{}: {}\n", entry.name(), entry.label());

    let _ = writeln!(out, "Position in BootOrder: {}", entry.source_index());
    let _ = writeln!(
        out,
        "Attributes: {:#010X} {:?}",
        option.attributes().bits(),
        option.attributes()
    );
    let _ = writeln!(out, "Description: {} code units", option.description_units());
    let _ = writeln!(out, "File path list: {} bytes", option.file_path_list_length());
    for node in DevicePathNodes::new(option.file_path_list()) {
        match node {
            Ok(node) => {
                let _ = writeln!(out, "  {node}");
            }
            Err(e) => {
                let _ = writeln!(out, "  {e}");
            }
        }
    }
    out.push_str(&hex_dump(option.file_path_list()));

    let _ = writeln!(out, "Optional data: {} bytes", option.optional_data().len());
    out.push_str(&hex_dump(option.optional_data()));
    out
}
