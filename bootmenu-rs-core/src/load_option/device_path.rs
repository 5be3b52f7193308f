// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Walks the node headers of a device path chain.
//!
//! Each node is self-describing: a type, a subtype, a little-endian `u16` length that includes the 4-byte
//! header, then the payload. Nothing beyond the header is interpreted here. The firmware does the actual
//! resolution of a device path when the image is loaded.

use core::fmt;

use crate::load_option::DecodeError;

/// The node type of the end of hardware device path nodes.
pub const END_HARDWARE_TYPE: u8 = 0x7F;

/// The subtype that ends an entire device path.
pub const END_ENTIRE_SUBTYPE: u8 = 0xFF;

/// The subtype that ends one instance of a multi-instance device path.
pub const END_INSTANCE_SUBTYPE: u8 = 0x01;

/// The size of a node header.
const NODE_HEADER_LEN: usize = 4;

/// One node of a device path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DevicePathNode<'a> {
    /// The node type.
    node_type: u8,

    /// The node subtype.
    sub_type: u8,

    /// The payload after the header.
    data: &'a [u8],
}

impl<'a> DevicePathNode<'a> {
    /// Returns the type of the node.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn node_type(&self) -> u8 {
        self.node_type
    }

    /// Returns the subtype of the node.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn sub_type(&self) -> u8 {
        self.sub_type
    }

    /// Returns the payload of the node.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the length of the node including its header.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn size(&self) -> usize {
        NODE_HEADER_LEN + self.data.len()
    }

    /// Checks if the node ends the entire device path.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn is_end_entire(&self) -> bool {
        self.node_type == END_HARDWARE_TYPE && self.sub_type == END_ENTIRE_SUBTYPE
    }

    /// Checks if the node ends one instance of the device path.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn is_end_instance(&self) -> bool {
        self.node_type == END_HARDWARE_TYPE && self.sub_type == END_INSTANCE_SUBTYPE
    }
}

impl fmt::Display for DevicePathNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type {:02X} subtype {:02X} ({} bytes)",
            self.node_type,
            self.sub_type,
            self.size()
        )
    }
}

/// An iterator over the nodes of a file path list.
///
/// A file path list may hold several device paths back to back, so iteration continues until the span is
/// used up. Once an error is yielded, the iterator is fused.
#[derive(Clone, Debug)]
pub struct DevicePathNodes<'a> {
    /// The bytes not yet walked.
    remaining: &'a [u8],

    /// The total length of the span, for error reporting.
    span_len: usize,
}

impl<'a> DevicePathNodes<'a> {
    /// Creates a new [`DevicePathNodes`] over a file path list.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn new(span: &'a [u8]) -> Self {
        Self {
            remaining: span,
            span_len: span.len(),
        }
    }
}

impl<'a> Iterator for DevicePathNodes<'a> {
    type Item = Result<DevicePathNode<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }

        let Some((header, _)) = self.remaining.split_first_chunk::<NODE_HEADER_LEN>() else {
            self.remaining = &[];
            return Some(Err(DecodeError::LengthMismatch(self.span_len)));
        };

        let length = usize::from(u16::from_le_bytes([header[2], header[3]]));
        if length < NODE_HEADER_LEN || length > self.remaining.len() {
            self.remaining = &[];
            return Some(Err(DecodeError::LengthMismatch(self.span_len)));
        }

        let (node, rest) = self.remaining.split_at(length);
        self.remaining = rest;

        Some(Ok(DevicePathNode {
            node_type: header[0],
            sub_type: header[1],
            data: &node[NODE_HEADER_LEN..],
        }))
    }
}

/// Checks that a file path list is a well formed chain of nodes.
///
/// The nodes must cover the span exactly, and the last one must end the entire device path.
///
/// # Errors
///
/// May return an `Error` if the span is empty, any node header is malformed, or the chain does not finish with
/// an end of entire device path node.
pub fn validate(span: &[u8]) -> Result<(), DecodeError> {
    let mut last = None;
    for node in DevicePathNodes::new(span) {
        last = Some(node?);
    }

    match last {
        Some(node) if node.is_end_entire() => Ok(()),
        _ => Err(DecodeError::LengthMismatch(span.len())),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use super::*;

    /// A media file path node for `\a`, followed by the end of entire device path node.
    pub(crate) const FILE_PATH_A: [u8; 14] = [
        0x04, 0x04, 0x0A, 0x00, b'\\', 0x00, b'a', 0x00, 0x00, 0x00, 0x7F, 0xFF, 0x04, 0x00,
    ];

    #[test]
    fn test_walk_nodes() {
        let nodes: Vec<_> = DevicePathNodes::new(&FILE_PATH_A)
            .collect::<Result<_, _>>()
            .expect("Failed to walk valid device path in test");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].node_type(), 0x04);
        assert_eq!(nodes[0].sub_type(), 0x04);
        assert_eq!(nodes[0].size(), 10);
        assert!(nodes[1].is_end_entire());
        assert!(validate(&FILE_PATH_A).is_ok());
    }

    #[test]
    fn test_multiple_instances() {
        let mut span = Vec::from(FILE_PATH_A);
        span.extend_from_slice(&FILE_PATH_A);
        assert_eq!(DevicePathNodes::new(&span).count(), 4);
        assert!(validate(&span).is_ok());
    }

    #[test]
    fn test_node_too_short() {
        let span = [0x04, 0x04, 0x02, 0x00, 0x7F, 0xFF, 0x04, 0x00];
        let mut nodes = DevicePathNodes::new(&span);
        assert_eq!(nodes.next(), Some(Err(DecodeError::LengthMismatch(8))));
        assert_eq!(nodes.next(), None);
    }

    #[test]
    fn test_node_overruns_span() {
        let span = [0x04, 0x04, 0x20, 0x00, 0x00];
        assert_eq!(validate(&span), Err(DecodeError::LengthMismatch(5)));
    }

    #[test]
    fn test_missing_end_node() {
        assert_eq!(
            validate(&FILE_PATH_A[..10]),
            Err(DecodeError::LengthMismatch(10))
        );
        assert_eq!(validate(&[]), Err(DecodeError::LengthMismatch(0)));
    }

    #[test]
    fn test_display() {
        let node = DevicePathNodes::new(&FILE_PATH_A)
            .next()
            .and_then(Result::ok)
            .expect("Failed to get first node in test");
        assert_eq!(
            alloc::format!("{node}"),
            "type 04 subtype 04 (10 bytes)"
        );
    }

    proptest! {
        #[test]
        fn doesnt_panic(x in any::<Vec<u8>>()) {
            let consumed: usize = DevicePathNodes::new(&x).filter_map(Result::ok).map(|node| node.size()).sum();
            prop_assert!(consumed <= x.len());
            let _ = validate(&x);
        }
    }
}
