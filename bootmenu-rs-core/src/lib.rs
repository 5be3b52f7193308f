// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The `bootmenu-rs` library crate.
//!
//! This reads the firmware's `BootOrder` and `Boot####` variables, decodes every `EFI_LOAD_OPTION` into a
//! [`load_option::LoadOption`] view, and keeps the results in a bounded [`boot::registry::Registry`]. A
//! frontend then drives the [`menu::Menu`] state machine, which hands the selected entry to the
//! [`boot::launcher::Launcher`].
//!
//! Every firmware service the core depends on (variables, image loading, the watchdog) is reached through a
//! trait in [`system`], so the decoding, selection and launch sequencing can be tested on the host.
//!
//! The reference frontend is the `bootmenu-rs` crate of this workspace, a plain console menu. A shell oriented frontend is
//! provided in `bootmenu-rs-cli`.
//!
//! ## MSRV
//!
//! The minimum supported rust version is 1.88.0.

#![cfg_attr(not(any(fuzzing, test, doctest)), no_std)]

/// The primary result type that wraps around [`crate::error::BootError`].
pub type BootResult<T> = Result<T, crate::error::BootError>;

pub mod boot;
pub mod error;
pub mod load_option;
pub mod menu;
pub mod system;

extern crate alloc;
