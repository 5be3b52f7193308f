// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let order = bootmenu_rs_core::load_option::boot_order(data);
    assert_eq!(order.len(), data.len() / 2);
});
