// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`shutdown`] which shuts down the system.

use uefi::{
    Status,
    runtime::{self, ResetType},
};

/// Shuts down the system.
///
/// This wraps around [`runtime::reset`]. The menu has nothing to return to once the user quits, so it powers off
/// instead of exiting back to the firmware.
pub fn shutdown() -> ! {
    runtime::reset(ResetType::SHUTDOWN, Status::SUCCESS, None)
}
