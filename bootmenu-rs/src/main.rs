// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The `bootmenu-rs` application.
//!
//! This lists the firmware's boot entries in a console menu, and launches the one that is picked. When the user
//! quits, the entries are released and the system is shut down.

#![no_main]
#![no_std]

extern crate alloc;

use bootmenu_rs_core::{
    boot::{BootMgr, action::shutdown},
    error::BootError,
    menu::Menu,
    system::log_backend::UefiLogger,
};
use log::{error, info};
use uefi::{prelude::*, proto::console::text::Output, system::with_stdout};

use crate::ui::Console;

mod ui;

/// The global logging instance.
static LOGGER: UefiLogger = UefiLogger::new();

/// The actual main function of the program, which returns an [`anyhow::Result`].
///
/// # Errors
///
/// May return an `Error` if `BootOrder` could not be read, there is no input protocol, or the console failed.
fn main_func() -> anyhow::Result<()> {
    uefi::helpers::init().map_err(BootError::Uefi)?; // initialize helpers (for print)
    with_stdout(Output::clear).map_err(BootError::Uefi)?;
    UefiLogger::install(&LOGGER, log::LevelFilter::Warn);

    let mut boot_mgr = BootMgr::new()?;
    UefiLogger::install(&LOGGER, boot_mgr.boot_config.log_level());

    let mut console = Console::new()?;
    if !boot_mgr.warnings().is_empty() {
        console.pause(&alloc::format!(
            "{} boot entries were skipped.",
            boot_mgr.warnings().len()
        ))?;
    }

    let mut launcher = boot_mgr.launcher();
    Menu::new(boot_mgr.list()).run(&mut console, &mut launcher)?;

    let released = boot_mgr.release_all();
    info!("Released {released} boot entries");
    Ok(())
}

/// The main function of the program.
///
/// On a fatal error, the error is shown until a key is pressed. The system is shut down either way.
#[entry]
fn main() -> Status {
    if let Err(e) = main_func() {
        error!("Fatal error occurred: {e}");
        match Console::new() {
            Ok(mut console) => {
                let _ = console.pause("The system will shut down.");
            }
            Err(_) => boot::stall(10_000_000),
        }
    }
    shutdown();
}
