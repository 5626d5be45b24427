//! Surrogate node identifiers (8 bytes, big-endian on the wire).
//!
//! A real id is any value in `0..=NodeId::MAX_VALUE`. The two sentinels are
//! encoded as the negative 64-bit values `-8` (does not exist) and `-9` (any),
//! so they can never collide with a real id once serialized.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::record::{RecordError, Result};

const RAW_DOES_NOT_EXIST: i64 = -8;
const RAW_ANY: i64 = -9;

/// Identifier for a term inside one node table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeId {
    /// An id assigned by a node table.
    Real(u64),
    /// Lookup failure marker. Never stored as the id of a term.
    Missing,
    /// Pattern wildcard. Never stored.
    Any,
}

impl NodeId {
    /// Width of a serialized id in bytes.
    pub const SIZE: usize = 8;
    /// Largest value a real id may carry.
    pub const MAX_VALUE: u64 = i64::MAX as u64;
    /// Alias for [`NodeId::Missing`].
    pub const NO_SUCH_NODE: NodeId = NodeId::Missing;
    /// Alias for [`NodeId::Any`].
    pub const ANY: NodeId = NodeId::Any;

    /// Build a real id. Values above [`NodeId::MAX_VALUE`] are rejected since
    /// they would overlap the sentinel encoding.
    pub fn new(value: u64) -> Result<Self> {
        if value > Self::MAX_VALUE {
            return Err(RecordError::IdOutOfRange(value));
        }
        Ok(NodeId::Real(value))
    }

    pub fn is_real(self) -> bool {
        matches!(self, NodeId::Real(_))
    }

    pub fn is_any(self) -> bool {
        matches!(self, NodeId::Any)
    }

    pub fn is_missing(self) -> bool {
        matches!(self, NodeId::Missing)
    }

    /// The numeric value of a real id.
    pub fn value(self) -> Option<u64> {
        match self {
            NodeId::Real(v) => Some(v),
            _ => None,
        }
    }

    /// The raw 64-bit pattern written to storage.
    pub fn to_raw(self) -> u64 {
        match self {
            NodeId::Real(v) => v,
            NodeId::Missing => RAW_DOES_NOT_EXIST as u64,
            NodeId::Any => RAW_ANY as u64,
        }
    }

    /// Inverse of [`NodeId::to_raw`]. Negative values other than the two
    /// sentinels do not correspond to any id.
    pub fn from_raw(raw: u64) -> Result<Self> {
        match raw as i64 {
            RAW_DOES_NOT_EXIST => Ok(NodeId::Missing),
            RAW_ANY => Ok(NodeId::Any),
            v if v >= 0 => Ok(NodeId::Real(raw)),
            _ => Err(RecordError::ReservedId(raw)),
        }
    }

    pub fn to_be_bytes(self) -> [u8; 8] {
        self.to_raw().to_be_bytes()
    }

    pub fn from_be_bytes(bytes: [u8; 8]) -> Result<Self> {
        Self::from_raw(u64::from_be_bytes(bytes))
    }

    /// Write exactly 8 bytes at `offset`.
    pub fn to_bytes(self, buf: &mut [u8], offset: usize) -> Result<()> {
        let end = offset
            .checked_add(Self::SIZE)
            .filter(|end| *end <= buf.len())
            .ok_or(RecordError::OutOfBounds {
                offset,
                need: Self::SIZE,
                len: buf.len(),
            })?;
        buf[offset..end].copy_from_slice(&self.to_be_bytes());
        Ok(())
    }

    /// Read the 8 bytes at `offset` back into an id.
    pub fn from_bytes(buf: &[u8], offset: usize) -> Result<Self> {
        let end = offset
            .checked_add(Self::SIZE)
            .filter(|end| *end <= buf.len())
            .ok_or(RecordError::OutOfBounds {
                offset,
                need: Self::SIZE,
                len: buf.len(),
            })?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&buf[offset..end]);
        Self::from_be_bytes(raw)
    }
}

impl Hash for NodeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.to_raw());
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Real(v) => write!(f, "[{}]", v),
            NodeId::Missing => write!(f, "[DoesNotExist]"),
            NodeId::Any => write!(f, "[Any]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_use_negative_encoding() {
        assert_eq!(NodeId::Missing.to_raw() as i64, -8);
        assert_eq!(NodeId::Any.to_raw() as i64, -9);
        assert_eq!(NodeId::Any.to_be_bytes()[0], 0xFF);
    }

    #[test]
    fn rejects_values_in_sentinel_range() {
        assert!(matches!(
            NodeId::new(u64::MAX),
            Err(RecordError::IdOutOfRange(_))
        ));
        assert!(NodeId::new(NodeId::MAX_VALUE).is_ok());
        // -1 is negative but not a sentinel
        assert!(matches!(
            NodeId::from_raw(u64::MAX),
            Err(RecordError::ReservedId(_))
        ));
    }

    #[test]
    fn bytes_at_offset() {
        let mut buf = [0u8; 20];
        let id = NodeId::new(0x0102_0304_0506_0708).unwrap();
        id.to_bytes(&mut buf, 3).unwrap();
        assert_eq!(&buf[3..11], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(buf[2], 0);
        assert_eq!(buf[11], 0);
        assert_eq!(NodeId::from_bytes(&buf, 3).unwrap(), id);
        assert!(NodeId::from_bytes(&buf, 13).is_err());
        assert!(id.to_bytes(&mut buf, 13).is_err());
    }

    #[test]
    fn display_forms() {
        assert_eq!(NodeId::Real(5).to_string(), "[5]");
        assert_eq!(NodeId::Any.to_string(), "[Any]");
        assert_eq!(NodeId::Missing.to_string(), "[DoesNotExist]");
    }
}
