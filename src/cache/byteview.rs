//! Byte View Module
//!
//! Immutable view over a cached value's bytes.

use std::fmt;

use bytes::Bytes;

use crate::cache::Value;

// == Byte View ==
/// An immutable view of a cached value.
///
/// Cloning is cheap (the payload is reference counted); every accessor
/// that hands out bytes hands out a copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteView {
    b: Bytes,
}

impl ByteView {
    /// Creates a view by copying the given bytes.
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self {
            b: Bytes::copy_from_slice(data),
        }
    }

    /// Number of bytes in the view.
    pub fn len(&self) -> usize {
        self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Returns a copy of the data as an owned byte vector.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.b.to_vec()
    }

    /// Returns the data as a string, replacing invalid UTF-8.
    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.b).into_owned()
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(data: Vec<u8>) -> Self {
        Self { b: Bytes::from(data) }
    }
}

impl From<Bytes> for ByteView {
    fn from(b: Bytes) -> Self {
        Self { b }
    }
}

impl Value for ByteView {
    fn size(&self) -> usize {
        self.b.len()
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.b))
    }
}
