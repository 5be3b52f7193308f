// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! UEFI variable access.
//!
//! Boot records live in the global variable namespace as `BootOrder` and `Boot####`. The boot menu's own settings
//! live in a custom vendor namespace, see [`BOOTMENU_VENDOR`].
//!
//! Every read goes through a [`VariableSource`], which is backed by runtime services on firmware.

use alloc::{boxed::Box, format};
use thiserror::Error;
use uefi::{
    CStr16, CString16, Status, cstr16, guid,
    runtime::{self, VariableVendor},
};

use crate::{
    BootResult,
    system::helper::{StrError, str_to_cstr},
};

/// The custom variable namespace for the boot menu.
pub const BOOTMENU_VENDOR: VariableVendor =
    VariableVendor(guid!("5b0d6c2e-8f3a-4e71-9a4c-2d6e8b1f7c30"));

/// The name of the variable holding the ordering list.
pub const BOOT_ORDER: &CStr16 = cstr16!("BootOrder");

/// An `Error` that may result from attempting to get a value from a UEFI variable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarError {
    /// The variable does not exist.
    #[error("Variable not found")]
    NotFound,

    /// The variable exists, but could not be read.
    #[error("Failed to read variable: {0}")]
    Read(Status),

    /// The variable does not have the size of the requested type.
    #[error("Variable has {actual} bytes, expected {expected}")]
    SizeMismatch {
        /// The size of the requested type.
        expected: usize,

        /// The size of the variable.
        actual: usize,
    },
}

/// A source of UEFI variables.
///
/// Usually this will use runtime services.
pub trait VariableSource {
    /// Get the whole content of a variable given its name and vendor.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the variable does not exist, or could not be read.
    fn get_variable(&self, name: &CStr16, vendor: &VariableVendor) -> Result<Box<[u8]>, VarError>;
}

/// UEFI variable source implementation with runtime services.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuntimeVariables;

impl VariableSource for RuntimeVariables {
    fn get_variable(&self, name: &CStr16, vendor: &VariableVendor) -> Result<Box<[u8]>, VarError> {
        match runtime::get_variable_boxed(name, vendor) {
            Ok((var, _)) => Ok(var),
            Err(e) if e.status() == Status::NOT_FOUND => Err(VarError::NotFound),
            Err(e) => Err(VarError::Read(e.status())),
        }
    }
}

/// A fixed size value that can be read from a UEFI variable.
pub trait UefiVariable: Sized {
    /// Convert a little endian byte slice to `Self`, if it has exactly the right size.
    fn from_bytes(bytes: &[u8]) -> Option<Self>;

    /// Return 0, or an equivalent value.
    fn default() -> Self;
}

/// Implements [`UefiVariable`] for an integer type.
macro_rules! uefi_variable_int {
    ($($int:ty),*) => {
        $(
            impl UefiVariable for $int {
                fn from_bytes(bytes: &[u8]) -> Option<Self> {
                    Some(Self::from_le_bytes(bytes.try_into().ok()?))
                }
                fn default() -> Self {
                    0
                }
            }
        )*
    };
}

uefi_variable_int!(usize, u64, u32, u16, u8);

impl UefiVariable for bool {
    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        u8::from_bytes(bytes).map(|x| x > 0)
    }
    fn default() -> Self {
        false
    }
}

/// Gets a UEFI variable of a [`UefiVariable`] given the name.
///
/// If None is specified for the vendor, then the variable will be searched for in [`BOOTMENU_VENDOR`], not the
/// global variables vendor space.
///
/// If the variable was not found, a default value of `0` will be returned. This is more convenient to handle
/// as settings are optional.
///
/// # Errors
///
/// May return an `Error` if the variable could not be read, or it does not have the size of `T`.
pub fn get_variable<T: UefiVariable>(
    source: &impl VariableSource,
    name: &CStr16,
    vendor: Option<VariableVendor>,
) -> BootResult<T> {
    let vendor = vendor.unwrap_or(BOOTMENU_VENDOR);
    match source.get_variable(name, &vendor) {
        Ok(bytes) => T::from_bytes(&bytes).ok_or_else(|| {
            VarError::SizeMismatch {
                expected: size_of::<T>(),
                actual: bytes.len(),
            }
            .into()
        }),
        Err(VarError::NotFound) => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

/// Gets the name of the `Boot####` variable for a boot option number.
///
/// The number is formatted as four uppercase hex digits, as the firmware does.
///
/// # Errors
///
/// May return an `Error` if the name could not be converted into a [`CString16`], which should not be possible.
pub fn boot_option_name(id: u16) -> Result<CString16, StrError> {
    str_to_cstr(&format!("Boot{id:04X}"))
}
