// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Decoder for `EFI_LOAD_OPTION` records.
//!
//! A load option is stored in a `Boot####` variable, and is laid out as follows:
//!
//! ```text
//! +------------+-----------------------+------------------------+----------------------+-----------------+
//! | attributes | file_path_list_length | description            | file_path_list       | optional_data   |
//! | u32 LE     | u16 LE                | UCS-2, NUL terminated  | file_path_list_length| the rest        |
//! +------------+-----------------------+------------------------+----------------------+-----------------+
//! ```
//!
//! Only the description is variable length without a declared size, so it is the one field that has to be found
//! by scanning. The description span always *includes* its 2-byte NUL terminator: a label of `n` code units
//! occupies `(n + 1) * 2` bytes, and the file path list begins directly after the terminator.
//!
//! Decoding is done once, producing a [`Layout`] of byte ranges. A [`LoadOption`] is a borrowed view built from
//! that layout, so the ranges are never recomputed from the live buffer.

use alloc::{string::String, vec::Vec};
use core::ops::Range;

use bitflags::bitflags;
use log::warn;
use thiserror::Error;

pub mod device_path;

/// The size of the fixed header, which is the attribute word followed by the file path list length.
pub const HEADER_LEN: usize = ATTRIBUTES_LEN + size_of::<u16>();

/// The size of the attribute word.
const ATTRIBUTES_LEN: usize = size_of::<u32>();

/// The size of one UCS-2 code unit.
const CODE_UNIT: usize = size_of::<u16>();

/// An `Error` that may result from decoding a load option.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The record ended before the declared end of one of its fields.
    #[error("Record truncated: {needed} bytes required, only {len} available")]
    Truncated {
        /// The amount of bytes that would have been needed to decode the field.
        needed: usize,

        /// The actual length of the buffer.
        len: usize,
    },

    /// The field lengths do not add up to the length of the record (or of the device path span).
    #[error("Field lengths do not partition the {0} byte record")]
    LengthMismatch(usize),
}

bitflags! {
    /// The attributes of a load option.
    ///
    /// These are kept as-is, and bits that are not known here are retained.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LoadOptionAttributes: u32 {
        /// The boot manager should attempt to boot this option automatically.
        const ACTIVE = 0x0000_0001;

        /// Drivers should be reconnected after loading this option.
        const FORCE_RECONNECT = 0x0000_0002;

        /// The option should not be shown in firmware menus.
        const HIDDEN = 0x0000_0008;

        /// The category mask.
        const CATEGORY = 0x0000_1F00;

        /// The option is an application rather than a boot target.
        const CATEGORY_APP = 0x0000_0100;
    }
}

/// The byte ranges of every field of a decoded load option.
///
/// The four ranges are contiguous, non-overlapping, and together with the header cover the record exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    /// The raw attribute word.
    attributes: u32,

    /// The declared length of the file path list.
    file_path_list_length: u16,

    /// The description, including its NUL terminator.
    description: Range<usize>,

    /// The device path chain.
    file_path_list: Range<usize>,

    /// The vendor specific data after the device paths.
    optional_data: Range<usize>,
}

impl Layout {
    /// Computes the layout of a load option record.
    ///
    /// `buf` must be exactly the record as returned from the variable store; nothing past its end is ever read.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the header is incomplete, no description terminator exists within the buffer, the
    /// file path list runs past the end of the buffer, or the fields do not add up to the record length.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let len = buf.len();
        let (header, rest) = buf
            .split_first_chunk::<HEADER_LEN>()
            .ok_or(DecodeError::Truncated {
                needed: HEADER_LEN,
                len,
            })?;

        let attributes = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let file_path_list_length = u16::from_le_bytes([header[4], header[5]]);

        // chunks_exact never yields a trailing odd byte, so a half code unit is never read
        let terminator = rest
            .chunks_exact(CODE_UNIT)
            .position(|unit| unit == [0, 0])
            .ok_or(DecodeError::Truncated {
                needed: HEADER_LEN + (rest.len() / CODE_UNIT + 1) * CODE_UNIT,
                len,
            })?;

        let description = HEADER_LEN..HEADER_LEN + (terminator + 1) * CODE_UNIT;

        let file_path_end = description.end + usize::from(file_path_list_length);
        if file_path_end > len {
            return Err(DecodeError::Truncated {
                needed: file_path_end,
                len,
            });
        }
        let file_path_list = description.end..file_path_end;

        let optional_len = len
            .checked_sub(file_path_end)
            .ok_or(DecodeError::LengthMismatch(len))?;
        let optional_data = file_path_end..file_path_end + optional_len;

        if HEADER_LEN + description.len() + file_path_list.len() + optional_data.len() != len {
            return Err(DecodeError::LengthMismatch(len));
        }

        Ok(Self {
            attributes,
            file_path_list_length,
            description,
            file_path_list,
            optional_data,
        })
    }

    /// Builds a [`LoadOption`] view over the buffer this layout was decoded from.
    ///
    /// The buffer must be the same one passed to [`Self::decode`].
    pub(crate) fn view<'a>(&self, buf: &'a [u8]) -> LoadOption<'a> {
        LoadOption {
            attributes: LoadOptionAttributes::from_bits_retain(self.attributes),
            file_path_list_length: self.file_path_list_length,
            description: &buf[self.description.clone()],
            file_path_list: &buf[self.file_path_list.clone()],
            optional_data: &buf[self.optional_data.clone()],
        }
    }
}

/// A decoded view of one load option.
///
/// Every span borrows from the original record; nothing is copied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadOption<'a> {
    /// The attributes of the load option.
    attributes: LoadOptionAttributes,

    /// The declared length of the file path list.
    file_path_list_length: u16,

    /// The description bytes, including the NUL terminator.
    description: &'a [u8],

    /// The device path chain.
    file_path_list: &'a [u8],

    /// The optional data.
    optional_data: &'a [u8],
}

impl<'a> LoadOption<'a> {
    /// Decodes a load option from a record.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the record is malformed, see [`Layout::decode`].
    pub fn decode(buf: &'a [u8]) -> Result<Self, DecodeError> {
        Ok(Layout::decode(buf)?.view(buf))
    }

    /// Returns the attributes of the load option.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn attributes(&self) -> LoadOptionAttributes {
        self.attributes
    }

    /// Returns the declared length of the file path list.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn file_path_list_length(&self) -> u16 {
        self.file_path_list_length
    }

    /// Returns the raw description bytes, including the 2-byte terminator.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn description_bytes(&self) -> &'a [u8] {
        self.description
    }

    /// Returns the number of code units in the description, including the terminator.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn description_units(&self) -> usize {
        self.description.len() / CODE_UNIT
    }

    /// Returns the description as a [`String`].
    ///
    /// Unpaired surrogates are replaced with the replacement character.
    #[must_use = "Has no effect if the result is unused"]
    pub fn label(&self) -> String {
        let units = self
            .description
            .chunks_exact(CODE_UNIT)
            .map(|unit| u16::from_le_bytes([unit[0], unit[1]]))
            .take_while(|&unit| unit != 0);

        char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }

    /// Returns the device path chain.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn file_path_list(&self) -> &'a [u8] {
        self.file_path_list
    }

    /// Returns the optional data.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn optional_data(&self) -> &'a [u8] {
        self.optional_data
    }

    /// Checks if the load option has a file path at all.
    ///
    /// An option without one decodes fine, but there is nothing to launch.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn has_file_path(&self) -> bool {
        !self.file_path_list.is_empty()
    }
}

/// Decodes the content of a `BootOrder` variable into a list of boot option numbers.
///
/// A trailing odd byte cannot be part of any number, so it is ignored.
#[must_use = "Has no effect if the result is unused"]
pub fn boot_order(bytes: &[u8]) -> Vec<u16> {
    let whole = bytes.len() - bytes.len() % size_of::<u16>();
    if whole != bytes.len() {
        warn!("BootOrder has an odd length of {} bytes", bytes.len());
    }

    // every architecture with UEFI support is little endian, so a native cast is fine here
    bytemuck::pod_collect_to_vec(&bytes[..whole])
}

#[cfg(test)]
pub(crate) mod tests {
    use proptest::prelude::*;

    use super::*;

    /// Builds a record out of its fields, with the length field derived from `file_path`.
    pub(crate) fn build_record(
        attributes: u32,
        description: &[u16],
        file_path: &[u8],
        optional: &[u8],
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&attributes.to_le_bytes());
        buf.extend_from_slice(
            &u16::try_from(file_path.len())
                .expect("Test file path is too long")
                .to_le_bytes(),
        );
        for unit in description.iter().chain(&[0]) {
            buf.extend_from_slice(&unit.to_le_bytes());
        }
        buf.extend_from_slice(file_path);
        buf.extend_from_slice(optional);
        buf
    }

    /// Encodes an `&str` as UCS-2 code units.
    pub(crate) fn units(str: &str) -> Vec<u16> {
        str.encode_utf16().collect()
    }

    #[test]
    fn test_basic_option() {
        let path = [0x7F, 0xFF, 0x04, 0x00];
        let record = build_record(1, &units("Linux"), &path, b"opt");
        let option = LoadOption::decode(&record).expect("Failed to decode valid record in test");

        assert_eq!(option.attributes(), LoadOptionAttributes::ACTIVE);
        assert_eq!(option.label(), "Linux");
        assert_eq!(option.description_units(), 6);
        assert_eq!(option.file_path_list(), &path);
        assert_eq!(option.optional_data(), b"opt");
        assert!(option.has_file_path());
    }

    #[test]
    fn test_terminator_accounting() {
        // a skew of one code unit on the terminator would shift both of the following spans by two bytes
        let record = build_record(0, &units("AB"), &[1, 2, 3, 4], &[5, 6]);
        let option = LoadOption::decode(&record).expect("Failed to decode valid record in test");

        assert_eq!(option.description_bytes(), &[b'A', 0, b'B', 0, 0, 0]);
        assert_eq!(option.file_path_list(), &[1, 2, 3, 4]);
        assert_eq!(option.optional_data(), &[5, 6]);
    }

    #[test]
    fn test_empty_description() {
        let record = build_record(0, &[], &[0x7F, 0xFF, 0x04, 0x00], &[]);
        let option = LoadOption::decode(&record).expect("Failed to decode valid record in test");
        assert_eq!(option.label(), "");
        assert_eq!(option.description_units(), 1);
    }

    #[test]
    fn test_empty_file_path() {
        let record = build_record(0, &units("No Path"), &[], &[]);
        let option = LoadOption::decode(&record).expect("Failed to decode valid record in test");
        assert!(!option.has_file_path());
        assert_eq!(option.file_path_list_length(), 0);
    }

    #[test]
    fn test_unknown_attributes_retained() {
        let record = build_record(0x8000_0109, &[], &[], &[]);
        let option = LoadOption::decode(&record).expect("Failed to decode valid record in test");
        assert_eq!(option.attributes().bits(), 0x8000_0109);
        assert!(option.attributes().contains(LoadOptionAttributes::HIDDEN));
    }

    #[test]
    fn test_short_header() {
        for len in 0..HEADER_LEN {
            let buf = vec![0xFF; len];
            assert_eq!(
                LoadOption::decode(&buf),
                Err(DecodeError::Truncated {
                    needed: HEADER_LEN,
                    len
                })
            );
        }
    }

    #[test]
    fn test_missing_terminator() {
        let mut record = build_record(0, &units("AB"), &[], &[]);
        record.truncate(record.len() - 2); // drop the terminator
        assert!(matches!(
            LoadOption::decode(&record),
            Err(DecodeError::Truncated { .. })
        ));

        record.push(0); // a lone byte is not a code unit
        assert!(matches!(
            LoadOption::decode(&record),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn test_sentinel_not_read() {
        // the bytes right after the boundary would complete the terminator if they were read
        let record = build_record(0, &units("AB"), &[], &[]);
        let boundary = record.len() - 2;
        assert_eq!(&record[boundary..], &[0, 0]);
        assert!(matches!(
            LoadOption::decode(&record[..boundary]),
            Err(DecodeError::Truncated { .. })
        ));

        let record = build_record(0, &units("AB"), &[9; 8], &[]);
        let boundary = record.len() - 1;
        assert_eq!(
            LoadOption::decode(&record[..boundary]),
            Err(DecodeError::Truncated {
                needed: record.len(),
                len: boundary
            })
        );
    }

    #[test]
    fn test_boot_order() {
        assert_eq!(boot_order(&[0x01, 0x00, 0x03, 0x00]), vec![0x0001, 0x0003]);
        assert_eq!(boot_order(&[0x34, 0x12, 0xFF]), vec![0x1234]);
        assert!(boot_order(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn doesnt_panic(x in any::<Vec<u8>>()) {
            let _ = LoadOption::decode(&x);
        }

        #[test]
        fn spans_partition_record(
            description in proptest::collection::vec(1..=u16::MAX, 0..64),
            file_path in proptest::collection::vec(any::<u8>(), 0..256),
            optional in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let record = build_record(0, &description, &file_path, &optional);
            let option = LoadOption::decode(&record).expect("Failed to decode valid record in test");
            prop_assert_eq!(option.description_units(), description.len() + 1);
            prop_assert_eq!(option.file_path_list(), &file_path[..]);
            prop_assert_eq!(option.optional_data(), &optional[..]);
        }

        #[test]
        fn truncation_is_detected(
            description in proptest::collection::vec(1..=u16::MAX, 0..16),
            file_path in proptest::collection::vec(any::<u8>(), 0..64),
            cut in any::<prop::sample::Index>(),
        ) {
            let record = build_record(0, &description, &file_path, &[]);
            let cut = cut.index(record.len()); // strictly inside the file path or earlier
            let result = LoadOption::decode(&record[..cut]);
            let truncated = matches!(result, Err(DecodeError::Truncated { needed: _, len: _ }));
            prop_assert!(truncated);
        }
    }
}
