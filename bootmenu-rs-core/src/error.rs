// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`BootError`], which encapsulates other errors

use thiserror::Error;

/// An `Error` resulting from the program.
#[derive(Error, Debug)]
pub enum BootError {
    /// An error with UEFI, or a service from the [`uefi`] crate.
    #[error("UEFI Error: {0}")]
    Uefi(#[from] uefi::Error),

    /// A `String` could not be converted into a `CString16`.
    #[error("String Conversion Error: {0}")]
    StrError(#[from] crate::system::helper::StrError),

    /// An error occurred while reading a UEFI variable.
    #[error("UEFI Variable Error: {0}")]
    VarError(#[from] crate::system::variable::VarError),

    /// A load option record could not be decoded.
    #[error("Load Option Decode Error: {0}")]
    DecodeError(#[from] crate::load_option::DecodeError),

    /// A boot entry could not be added to the registry.
    #[error("Registry Error: {0}")]
    RegistryError(#[from] crate::boot::registry::RegistryError),

    /// A boot entry could not be launched.
    #[error("Launch Error: {0}")]
    LaunchError(#[from] crate::boot::launcher::LaunchError),

    /// The watchdog timer could not be armed or disarmed.
    #[error("Watchdog Error: {0}")]
    WatchdogError(#[from] crate::system::watchdog::WatchdogError),
}
