// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Various helper functions for other modules.

use alloc::string::String;
use core::fmt::Write;

use thiserror::Error;
use uefi::{
    CString16,
    boot::{self, ScopedProtocol},
    proto::ProtocolPointer,
};

use crate::BootResult;

/// The amount of bytes shown on one line of a hex dump.
const HEX_DUMP_WIDTH: usize = 16;

/// An `Error` that may result from converting a [`String`] to another format.
#[derive(Error, Debug)]
pub enum StrError {
    /// A [`String`] could not be converted into a [`CString16`]
    #[error("Could not convert String to CString16")]
    CstrFromStr(#[from] uefi::data_types::FromStrError),
}

/// Gets a [`CString16`] from an [`&str`].
///
/// # Errors
///
/// May return an `Error` if the string could not be converted into a [`CString16`], either due to unsupported
/// characters or an invalid nul character.
pub fn str_to_cstr(str: &str) -> Result<CString16, StrError> {
    Ok(CString16::try_from(str)?)
}

/// Opens the first handle supporting a protocol exclusively.
///
/// # Errors
///
/// May return an `Error` if no handle supports the protocol, or the protocol could not be opened.
pub fn locate_protocol<P: ProtocolPointer + ?Sized>() -> BootResult<ScopedProtocol<P>> {
    let handle = boot::get_handle_for_protocol::<P>()?;
    Ok(boot::open_protocol_exclusive::<P>(handle)?)
}

/// Formats bytes as rows of space separated uppercase hex pairs.
///
/// Every row holds up to 16 bytes and is prefixed with its offset.
#[must_use = "Has no effect if the result is unused"]
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in bytes.chunks(HEX_DUMP_WIDTH).enumerate() {
        let _ = write!(out, "{:04X}:", row * HEX_DUMP_WIDTH);
        for byte in chunk {
            let _ = write!(out, " {byte:02X}");
        }
        out.push('\n');
    }
    out
}

/// Replaces every character that cannot be encoded as a single UCS-2 code unit with U+FFFD.
///
/// The console only accepts the Basic Multilingual Plane, so labels must pass through this before being printed.
#[must_use = "Has no effect if the result is unused"]
pub fn to_console_text(str: &str) -> String {
    str.chars()
        .map(|c| {
            if u32::from(c) > 0xFFFF {
                char::REPLACEMENT_CHARACTER
            } else {
                c
            }
        })
        .collect()
}
