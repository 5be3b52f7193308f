// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

#![no_main]

use bootmenu_rs_core::load_option::device_path::{DevicePathNodes, validate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for node in DevicePathNodes::new(data).flatten() {
        let _ = node.to_string();
    }
    let _ = validate(data);
});
