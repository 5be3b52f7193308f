// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! System re-exports

pub mod helper;
pub mod image;
pub mod log_backend;
pub mod variable;
pub mod watchdog;

mod panic_handler;
