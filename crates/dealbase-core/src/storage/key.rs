//! Record key encoding.

use std::fmt;

/// Size of an encoded record key in bytes.
pub const KEY_SIZE: usize = 8;

/// A record key wrapping the store-assigned id.
///
/// Keys encode big-endian so lexicographic ordering matches numeric
/// ordering: tree iteration yields rows ascending by id, which is ascending
/// by creation time since ids are allocated monotonically.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey(pub u64);

impl RecordKey {
    /// Encode the key to bytes.
    pub fn encode(&self) -> [u8; KEY_SIZE] {
        self.0.to_be_bytes()
    }

    /// Decode a key from bytes.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let array: [u8; KEY_SIZE] = bytes.try_into().ok()?;
        Some(Self(u64::from_be_bytes(array)))
    }
}

impl fmt::Debug for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordKey").field(&self.0).finish()
    }
}
