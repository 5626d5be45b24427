//! Sorted record storage in one contiguous buffer.
//!
//! [`RecordBuffer`] keeps records of a single [`RecordFactory`] shape ordered
//! by key bytes. Lookups are binary searches over the slots; inserts and
//! removals shift the tail of the buffer. Keys are unique: inserting a key
//! that is already present overwrites its value.

use std::cmp::Ordering;

use crate::record::{Record, RecordFactory, Result};

#[derive(Debug, Clone)]
pub struct RecordBuffer {
    factory: RecordFactory,
    bytes: Vec<u8>,
    len: usize,
}

impl RecordBuffer {
    pub fn new(factory: RecordFactory) -> Self {
        Self {
            factory,
            bytes: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(factory: RecordFactory, records: usize) -> Self {
        Self {
            factory,
            bytes: Vec::with_capacity(records * factory.record_length()),
            len: 0,
        }
    }

    pub fn factory(&self) -> &RecordFactory {
        &self.factory
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw slot bytes, `len() * record_length()` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn key(&self, slot: usize) -> Option<&[u8]> {
        if slot >= self.len {
            return None;
        }
        self.factory.key_slice(&self.bytes, slot)
    }

    pub fn get(&self, slot: usize) -> Option<Record> {
        if slot >= self.len {
            return None;
        }
        self.factory.build_from(&self.bytes, slot).ok()
    }

    /// Binary search by key: `Ok(slot)` when present, `Err(slot)` with the
    /// insertion point otherwise.
    pub fn find(&self, key: &[u8]) -> std::result::Result<usize, usize> {
        let mut lo = 0usize;
        let mut hi = self.len;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.slot_key(mid).cmp(key) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Ok(mid),
            }
        }
        Err(lo)
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.find(key).is_ok()
    }

    /// Insert `record`, returning `false` when the key was already present.
    pub fn insert(&mut self, record: Record) -> Result<bool> {
        let slot_len = self.factory.record_length();
        match self.find(record.key()) {
            Ok(slot) => {
                self.factory.insert_into(&record, &mut self.bytes, slot)?;
                Ok(false)
            }
            Err(slot) => {
                // validate before the buffer grows
                let checked = self.factory.create(record.key(), record.value())?;
                self.bytes.resize((self.len + 1) * slot_len, 0);
                self.bytes
                    .copy_within(slot * slot_len..self.len * slot_len, (slot + 1) * slot_len);
                self.factory.insert_into(&checked, &mut self.bytes, slot)?;
                self.len += 1;
                Ok(true)
            }
        }
    }

    /// Remove the record stored under `key`.
    pub fn remove(&mut self, key: &[u8]) -> Result<Option<Record>> {
        let Ok(slot) = self.find(key) else {
            return Ok(None);
        };
        let slot_len = self.factory.record_length();
        let record = self.factory.build_from(&self.bytes, slot)?;
        self.bytes
            .copy_within((slot + 1) * slot_len..self.len * slot_len, slot * slot_len);
        self.len -= 1;
        self.bytes.truncate(self.len * slot_len);
        Ok(Some(record))
    }

    /// First slot whose key is not less than `prefix`.
    pub fn lower_bound(&self, prefix: &[u8]) -> usize {
        let mut lo = 0usize;
        let mut hi = self.len;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.slot_key(mid) < prefix {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Keys starting with `prefix`, in key order. An empty prefix scans the
    /// whole buffer.
    pub fn scan_prefix<'a>(&'a self, prefix: &'a [u8]) -> PrefixScan<'a> {
        PrefixScan {
            buf: self,
            prefix,
            slot: self.lower_bound(prefix),
        }
    }

    /// All records in key order.
    pub fn iter(&self) -> impl Iterator<Item = Record> + '_ {
        (0..self.len).filter_map(move |slot| self.get(slot))
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
        self.len = 0;
    }

    fn slot_key(&self, slot: usize) -> &[u8] {
        let start = slot * self.factory.record_length();
        &self.bytes[start..start + self.factory.key_length()]
    }
}

/// Iterator over the keys sharing a prefix.
#[derive(Debug)]
pub struct PrefixScan<'a> {
    buf: &'a RecordBuffer,
    prefix: &'a [u8],
    slot: usize,
}

impl<'a> Iterator for PrefixScan<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.slot >= self.buf.len {
            return None;
        }
        let key = self.buf.slot_key(self.slot);
        if !key.starts_with(self.prefix) {
            self.slot = self.buf.len;
            return None;
        }
        self.slot += 1;
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> RecordFactory {
        RecordFactory::new(2, 1).unwrap()
    }

    fn rec(k: [u8; 2], v: u8) -> Record {
        factory().create(&k, Some(&[v])).unwrap()
    }

    #[test]
    fn keeps_key_order() {
        let mut b = RecordBuffer::new(factory());
        for (k, v) in [([3, 0], 1), ([1, 5], 2), ([2, 2], 3), ([1, 1], 4)] {
            assert!(b.insert(rec(k, v)).unwrap());
        }
        let keys: Vec<_> = (0..b.len()).map(|i| b.key(i).unwrap().to_vec()).collect();
        assert_eq!(keys, vec![vec![1, 1], vec![1, 5], vec![2, 2], vec![3, 0]]);
        assert_eq!(b.as_bytes().len(), 4 * 3);
    }

    #[test]
    fn duplicate_key_overwrites_value() {
        let mut b = RecordBuffer::new(factory());
        assert!(b.insert(rec([1, 1], 1)).unwrap());
        assert!(!b.insert(rec([1, 1], 9)).unwrap());
        assert_eq!(b.len(), 1);
        assert_eq!(b.get(0).unwrap().value(), Some(&[9u8][..]));
    }

    #[test]
    fn remove_shifts_tail() {
        let mut b = RecordBuffer::new(factory());
        for k in 0..5u8 {
            b.insert(rec([k, k], k)).unwrap();
        }
        let gone = b.remove(&[2, 2]).unwrap().unwrap();
        assert_eq!(gone.value(), Some(&[2u8][..]));
        assert!(b.remove(&[2, 2]).unwrap().is_none());
        assert_eq!(b.len(), 4);
        assert!(b.contains(&[3, 3]));
        assert!(!b.contains(&[2, 2]));
    }

    #[test]
    fn prefix_scan_bounds() {
        let mut b = RecordBuffer::new(factory());
        for k in [[1, 1], [1, 2], [2, 0], [2, 9], [3, 3]] {
            b.insert(rec(k, 0)).unwrap();
        }
        let hits: Vec<_> = b.scan_prefix(&[2]).map(|k| k.to_vec()).collect();
        assert_eq!(hits, vec![vec![2, 0], vec![2, 9]]);
        assert_eq!(b.scan_prefix(&[]).count(), 5);
        assert_eq!(b.scan_prefix(&[4]).count(), 0);
        assert_eq!(b.scan_prefix(&[0]).count(), 0);
    }

    #[test]
    fn bad_shape_leaves_buffer_untouched() {
        let mut b = RecordBuffer::new(factory());
        b.insert(rec([1, 1], 1)).unwrap();
        let other = RecordFactory::new(2, 0).unwrap();
        let err = b.insert(other.create(&[0, 0], None).unwrap()).unwrap_err();
        assert!(err.is_shape_mismatch());
        assert_eq!(b.len(), 1);
        assert_eq!(b.as_bytes().len(), 3);
    }
}
