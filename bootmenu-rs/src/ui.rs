// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! A plain console frontend for the [`Menu`].
//!
//! The menu is drawn as an 80 column box, with one row per entry and the selected row highlighted.

use alloc::{format, string::String};
use core::fmt::Write;

use bootmenu_rs_core::{
    BootResult,
    boot::entry::BootEntry,
    error::BootError,
    menu::{Command, Menu, MenuFrontend, dump_entry},
    system::helper::{locate_protocol, to_console_text},
};
use uefi::{
    Event, ResultExt, Status,
    boot::{self, ScopedProtocol},
    proto::console::text::{Color, Input, Key, Output},
    system::with_stdout,
};

/// The width of the menu box, including its borders.
const BOX_WIDTH: usize = 80;

/// The width of a row inside the menu box.
const ROW_WIDTH: usize = BOX_WIDTH - 2;

/// The normal colors as foreground, background.
const NORMAL: (Color, Color) = (Color::LightGray, Color::Black);

/// The colors of the selected row.
const HIGHLIGHT: (Color, Color) = (Color::Black, Color::LightGray);

/// The console, drawing the menu and reading keys.
pub struct Console {
    /// The keyboard.
    input: ScopedProtocol<Input>,

    /// The key event of the keyboard.
    events: [Event; 1],
}

impl Console {
    /// Creates a new [`Console`].
    ///
    /// # Errors
    ///
    /// May return an `Error` if the system does not support an [`Input`].
    pub fn new() -> BootResult<Self> {
        let input = locate_protocol::<Input>()?;
        let event = input
            .wait_for_key_event()
            .ok_or_else(|| BootError::Uefi(Status::NOT_READY.into()))?;
        Ok(Self {
            input,
            events: [event],
        })
    }

    /// Blocks until a key is pressed, then returns it.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the keyboard failed.
    pub fn read_key(&mut self) -> BootResult<Key> {
        loop {
            boot::wait_for_event(&mut self.events).discard_errdata()?;
            if let Some(key) = self.input.read_key()? {
                return Ok(key);
            }
        }
    }

    /// Prints a message, then waits for any key.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the keyboard failed.
    pub fn pause(&mut self, message: &str) -> BootResult<()> {
        with_stdout(|out| write(out, &format!("{message}\nPress any key to continue\n")))?;
        self.read_key().map(|_| ())
    }
}

impl MenuFrontend for Console {
    fn render(&mut self, menu: &Menu<'_>) -> BootResult<()> {
        with_stdout(|out| draw_menu(out, menu))
    }

    fn read_command(&mut self) -> BootResult<Command> {
        loop {
            if let Some(command) = Command::from_key(self.read_key()?) {
                return Ok(command);
            }
        }
    }

    fn show_dump(&mut self, entry: &BootEntry) -> BootResult<()> {
        with_stdout(|out| -> BootResult<()> {
            out.set_color(NORMAL.0, NORMAL.1)?;
            out.clear()?;
            Ok(())
        })?;
        self.pause(&dump_entry(entry))
    }

    fn report(&mut self, error: &BootError) -> BootResult<()> {
        with_stdout(|out| -> BootResult<()> {
            out.set_color(NORMAL.0, NORMAL.1)?;
            out.clear()?;
            Ok(())
        })?;
        self.pause(&format!("Error: {error}"))
    }
}

/// Writes a string to the console, replacing characters it cannot show.
fn write(out: &mut Output, str: &str) -> BootResult<()> {
    out.write_str(&to_console_text(str))
        .map_err(|_| BootError::Uefi(Status::DEVICE_ERROR.into()))
}

/// Writes a full row of the menu at a line.
fn draw_row(out: &mut Output, y: usize, text: &str, highlighted: bool) -> BootResult<()> {
    out.set_cursor_position(0, y)?;
    write(out, "\u{2502}")?;

    if highlighted {
        out.set_color(HIGHLIGHT.0, HIGHLIGHT.1)?;
    }
    let text: String = text.chars().take(ROW_WIDTH).collect();
    write(out, &format!("{text:<width$}", width = ROW_WIDTH))?;
    out.set_color(NORMAL.0, NORMAL.1)?;

    write(out, "\u{2502}")
}

/// Writes the top or bottom border of the menu at a line.
fn draw_border(out: &mut Output, y: usize, left: char, right: char) -> BootResult<()> {
    out.set_cursor_position(0, y)?;
    let line: String = core::iter::once(left)
        .chain(core::iter::repeat_n('\u{2500}', ROW_WIDTH))
        .chain(core::iter::once(right))
        .collect();
    write(out, &line)
}

/// Draws the whole menu.
fn draw_menu(out: &mut Output, menu: &Menu<'_>) -> BootResult<()> {
    out.set_color(NORMAL.0, NORMAL.1)?;
    out.clear()?;
    let _ = out.enable_cursor(false);

    write(out, " bootmenu-rs")?;
    draw_border(out, 1, '\u{250C}', '\u{2510}')?;

    let mut y = 2;
    if menu.entry_count() == 0 {
        draw_row(out, y, " No boot entries found", false)?;
        y += 1;
    }
    for i in 0..menu.entry_count() {
        let text = format!(" {:>2}  {}", i + 1, menu.entry_label(i));
        draw_row(out, y, &text, i == menu.selected_index())?;
        y += 1;
    }

    draw_border(out, y, '\u{2514}', '\u{2518}')?;
    out.set_cursor_position(0, y + 1)?;
    write(out, " Up/Down: select   Enter: boot   i: inspect   q/Esc: quit")
}
