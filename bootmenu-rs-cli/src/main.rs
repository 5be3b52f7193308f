// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! A command line interface frontend to `bootmenu-rs`.
//!
//! This is meant to be ran from the UEFI shell, to list, inspect, or launch boot entries without the menu.

#![no_main]
#![no_std]

extern crate alloc;

use alloc::string::ToString;

use bootmenu_rs_core::{
    BootResult,
    boot::BootMgr,
    menu::dump_entry,
    system::{helper::to_console_text, log_backend::UefiLogger},
};
use getargs::{Arg, Options};
use uefi::{Status, boot, cstr16, entry, println, proto::loaded_image::LoadedImage};

/// The global logging instance.
static LOGGER: UefiLogger = UefiLogger::new();

/// Parses the value of an argument as an index into the boot entries.
///
/// Prints the problem and returns `None` if the value is missing, not a number, or out of range.
fn parse_index<'a>(
    opts: &mut Options<&'a str, impl Iterator<Item = &'a str>>,
    arg: &str,
    len: usize,
) -> Option<usize> {
    let Ok(value) = opts.value() else {
        println!("Error: An index was not passed into the {arg} argument");
        return None;
    };
    match value.parse() {
        Ok(idx) if idx < len => Some(idx),
        Ok(_) => {
            println!("Error: The value passed to the {arg} argument was not in range of the list");
            None
        }
        Err(e) => {
            println!(
                "Error: {e} (The value passed to the {arg} argument could not be parsed as a number)"
            );
            None
        }
    }
}

/// The actual main function of the program.
///
/// # Errors
///
/// May return an `Error` if the program could not obtain the `LoadedImage` protocol, or `BootOrder` could not be
/// read.
fn main_func() -> BootResult<()> {
    uefi::helpers::init()?; // initialize helpers (for print)

    let load_options = {
        let handle = boot::image_handle();
        let loaded_image = boot::open_protocol_exclusive::<LoadedImage>(handle)?;
        loaded_image
            .load_options_as_cstr16()
            .unwrap_or(cstr16!("bootmenu-rs-cli.efi")) // there is at least one argument, which is the filename
            .to_string()
    }; // loaded_image dropped here

    let mut options = load_options.split_whitespace();

    let Some(app_filename) = options.next() else {
        println!("Error: No load options were passed to the program");
        return Ok(());
    };

    UefiLogger::install(&LOGGER, log::LevelFilter::Warn);

    let boot_mgr = BootMgr::new()?;
    UefiLogger::install(&LOGGER, boot_mgr.boot_config.log_level());

    let mut opts = Options::new(options);
    while let Ok(Some(arg)) = opts.next_arg() {
        match arg {
            Arg::Short('l') | Arg::Long("list") => {
                for (i, entry) in boot_mgr.list().iter().enumerate() {
                    println!("{i}: {} ({})", to_console_text(&entry.label()), entry.name());
                }
                return Ok(());
            }
            Arg::Short('d') | Arg::Long("dump") => {
                if let Some(idx) = parse_index(&mut opts, "dump", boot_mgr.list().len()) {
                    println!("{}", to_console_text(&dump_entry(boot_mgr.list().get(idx))));
                }
                return Ok(());
            }
            Arg::Short('b') | Arg::Long("boot") => {
                if let Some(idx) = parse_index(&mut opts, "boot", boot_mgr.list().len()) {
                    boot_mgr.launcher().launch(boot_mgr.list().get(idx))?;
                }
                return Ok(());
            }
            Arg::Short('h') | Arg::Long("help") => break, // ignore any other arguments and break out of the while loop when help is specified
            Arg::Short(invalid) => println!("Error: Unknown short argument: -{invalid}"),
            Arg::Long(invalid) => println!("Error: Unknown long argument: --{invalid}"),
            Arg::Positional(invalid) => println!("Error: Unknown positional argument: {invalid}"),
        }
    }

    println!(
        r"Usage: {app_filename} [OPTIONS] [ARGS]...

-h, --help       display this help and exit
-l, --list       display boot entries and exit
-d, --dump       display the decoded record of the given boot entry index
-b, --boot       launch the given boot entry index
"
    );

    Ok(())
}

/// The main function of the program.
///
/// This will not panic on a fatal error, rather, it will return control to the UEFI shell (or the firmware menu).
/// This program is intended to be ran as a shell script, so panicking here would not make any sense.
#[entry]
fn main() -> Status {
    match main_func() {
        Ok(()) => Status::SUCCESS,
        Err(e) => {
            println!("Error: {e}");
            Status::ABORTED
        }
    }
}
