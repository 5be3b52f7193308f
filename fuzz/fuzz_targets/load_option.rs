// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

#![no_main]

use bootmenu_rs_core::load_option::LoadOption;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(option) = LoadOption::decode(data) {
        let spans = option.description_bytes().len()
            + option.file_path_list().len()
            + option.optional_data().len();
        assert_eq!(spans + 6, data.len());
        let _ = option.label();
    }
});
